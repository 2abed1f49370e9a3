//! User repository for registered accounts.

use std::sync::Arc;

use budgein_core::auth::{User, normalize_email};
use budgein_shared::types::UserId;
use tokio::sync::RwLock;
use tracing::info;

use crate::{Persistence, StoreError};

/// User repository backed by the `users` collection.
pub struct UserRepository {
    users: RwLock<Vec<User>>,
    persistence: Arc<dyn Persistence>,
}

impl std::fmt::Debug for UserRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRepository").finish_non_exhaustive()
    }
}

impl UserRepository {
    /// Loads all users from `persistence`.
    ///
    /// # Errors
    ///
    /// Returns an error if the user collection cannot be read.
    pub async fn open(persistence: Arc<dyn Persistence>) -> Result<Self, StoreError> {
        let users = persistence.load_users().await?;
        Ok(Self {
            users: RwLock::new(users),
            persistence,
        })
    }

    /// Finds a user by email, ignoring case and surrounding whitespace.
    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        let email = normalize_email(email);
        self.users
            .read()
            .await
            .iter()
            .find(|u| u.email == email)
            .cloned()
    }

    /// Finds a user by ID.
    pub async fn find_by_id(&self, id: UserId) -> Option<User> {
        self.users.read().await.iter().find(|u| u.id == id).cloned()
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateEmail` if the email is taken, or a
    /// storage error if the user list cannot be saved.
    pub async fn create(
        &self,
        email: &str,
        username: &str,
        password_hash: String,
    ) -> Result<User, StoreError> {
        let user = User::new(email, username, password_hash);

        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail(user.email));
        }

        let mut working = users.clone();
        working.push(user.clone());
        self.persistence.save_users(&working).await?;
        *users = working;

        info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }
}
