//! Persistence backends.
//!
//! A backend stores full snapshots: every save replaces the previous contents
//! of a collection wholesale.

mod json;
mod memory;

pub use json::JsonFilePersistence;
pub use memory::MemoryPersistence;

use async_trait::async_trait;
use budgein_core::{auth::User, budget::Snapshot};

use crate::StoreError;

/// Storage for the budget snapshot and the user list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Persistence: Send + Sync {
    /// Loads budgets and expenses. Missing data reads as empty.
    async fn load_snapshot(&self) -> Result<Snapshot, StoreError>;

    /// Replaces budgets and expenses.
    async fn save_snapshot(&self, snapshot: &Snapshot) -> Result<(), StoreError>;

    /// Loads all users. Missing data reads as empty.
    async fn load_users(&self) -> Result<Vec<User>, StoreError>;

    /// Replaces all users.
    async fn save_users(&self, users: &[User]) -> Result<(), StoreError>;
}
