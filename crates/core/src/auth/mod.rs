//! Authentication and password hashing.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification
//! - The stored user record

mod password;

pub use password::{PasswordError, burn_verification, hash_password, verify_password};

use budgein_shared::types::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id: UserId,
    /// Login email, stored lowercase.
    pub email: String,
    /// Display name.
    pub username: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user record with a fresh ID.
    #[must_use]
    pub fn new(email: &str, username: &str, password_hash: String) -> Self {
        Self {
            id: UserId::new(),
            email: normalize_email(email),
            username: username.to_string(),
            password_hash,
            created_at: Utc::now(),
        }
    }
}

/// Canonical form used to compare emails.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
