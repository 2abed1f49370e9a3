//! Budgets, expenses, and the spent-total invariant.
//!
//! [`BudgetBook`] owns both collections and is the only place that mutates them.
//! After every successful operation, each budget's `spent` equals the sum of the
//! amounts of the expenses attached to it.

pub mod book;
pub mod error;
pub mod ids;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use book::{BudgetBook, DeletedBudget, ReconcileReport};
pub use error::BudgetError;
pub use ids::IdGenerator;
pub use service::BudgetService;
pub use types::{
    Budget, CreateBudgetInput, CreateExpenseInput, Expense, Snapshot, UpdateBudgetInput,
};
