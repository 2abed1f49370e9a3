//! Stores that sit between callers and a persistence backend.
//!
//! Each store keeps the authoritative copy in memory and writes the whole
//! collection through to the backend on every change.

pub mod budget;
pub mod user;

pub use budget::BudgetStore;
pub use user::UserRepository;
