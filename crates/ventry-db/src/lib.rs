pub mod pool;
pub mod repos;

// Re-export commonly used items
pub use pool::{create_pool, run_migrations};
pub use repos::business::{BusinessFilter, BusinessRepo, BusinessRow, BusinessUpdate, NewBusiness};
pub use repos::inventory::{InventoryItemRow, InventoryItemUpdate, InventoryRepo, NewInventoryItem};
pub use repos::refresh_token::{RefreshTokenRepo, RefreshTokenRow};
pub use repos::user::{ProfileUpdate, UserRepo, UserRow};

/// True when the error chain bottoms out in a database unique-constraint
/// violation. Concurrent duplicate inserts are resolved by the constraint,
/// not by application-level locking; callers map this to a 409.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|db| db.is_unique_violation())
}
