//! Budget error types.

use budgein_shared::{
    AppError,
    types::{BudgetId, ExpenseId},
};
use thiserror::Error;

/// Budget and expense errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BudgetError {
    /// Name is empty or whitespace.
    #[error("Name cannot be empty")]
    EmptyName,

    /// Amount cannot be negative.
    #[error("Amount cannot be negative")]
    NegativeAmount,

    /// Budget not found.
    #[error("Budget not found: {0}")]
    NotFound(BudgetId),

    /// Expense not found.
    #[error("Expense not found: {0}")]
    ExpenseNotFound(ExpenseId),

    /// Another budget already uses this name.
    #[error("Budget name already exists: {0}")]
    DuplicateName(String),

    /// Expense references a budget name that does not exist.
    #[error("No budget named '{0}'")]
    UnknownBudget(String),

    /// Adding the amount would push a budget's total past the largest representable value.
    #[error("Amount too large: total spent would overflow")]
    AmountOverflow,
}

impl From<BudgetError> for AppError {
    fn from(err: BudgetError) -> Self {
        let message = err.to_string();
        match err {
            BudgetError::EmptyName | BudgetError::NegativeAmount | BudgetError::AmountOverflow => {
                Self::Validation(message)
            }
            BudgetError::NotFound(_) | BudgetError::ExpenseNotFound(_) => Self::NotFound(message),
            BudgetError::DuplicateName(_) => Self::Conflict(message),
            BudgetError::UnknownBudget(_) => Self::BusinessRule(message),
        }
    }
}
