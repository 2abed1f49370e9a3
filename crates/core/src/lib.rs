//! Core business logic for BudgeIn.
//!
//! This crate contains pure business logic with ZERO web or storage dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `budget` - Budgets, expenses, and the spent-total invariant
//! - `auth` - Password hashing and user records

pub mod auth;
pub mod budget;
