//! In-memory backend for tests and throwaway runs.

use async_trait::async_trait;
use budgein_core::{auth::User, budget::Snapshot};
use tokio::sync::Mutex;

use super::Persistence;
use crate::StoreError;

/// Keeps the last saved snapshot in process memory.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    snapshot: Mutex<Snapshot>,
    users: Mutex<Vec<User>>,
}

impl MemoryPersistence {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-loaded with a snapshot.
    #[must_use]
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
            users: Mutex::default(),
        }
    }
}

#[async_trait]
impl Persistence for MemoryPersistence {
    async fn load_snapshot(&self) -> Result<Snapshot, StoreError> {
        Ok(self.snapshot.lock().await.clone())
    }

    async fn save_snapshot(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        *self.snapshot.lock().await = snapshot.clone();
        Ok(())
    }

    async fn load_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.lock().await.clone())
    }

    async fn save_users(&self, users: &[User]) -> Result<(), StoreError> {
        *self.users.lock().await = users.to_vec();
        Ok(())
    }
}
