pub mod models;
pub mod validation;
