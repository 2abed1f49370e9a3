//! Shared types, errors, and configuration for BudgeIn.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for budgets, expenses, and users
//! - Currency display formatting
//! - Application-wide error types
//! - JWT claims, token service, and auth payloads
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
