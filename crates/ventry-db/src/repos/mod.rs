pub mod business;
pub mod inventory;
pub mod refresh_token;
pub mod user;
