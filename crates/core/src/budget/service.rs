//! Budget calculations and field validation.

use rust_decimal::Decimal;

use super::error::BudgetError;
use super::types::Budget;

/// Budget service for business logic.
pub struct BudgetService;

impl BudgetService {
    /// Share of the budget already spent, in percent.
    ///
    /// Clamped to `0..=100` and rounded to 2 decimal places. A zero (or negative)
    /// allocation yields 0 rather than dividing by zero.
    #[must_use]
    pub fn percentage(budget: &Budget) -> Decimal {
        if budget.amount <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        // Overflow only happens when spent dwarfs the amount, which clamps to 100.
        budget
            .spent
            .checked_div(budget.amount)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::ONE_HUNDRED)
            .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
            .round_dp(2)
    }

    /// Funds left in the budget; negative when overspent.
    #[must_use]
    pub fn remaining(budget: &Budget) -> Decimal {
        budget.amount - budget.spent
    }

    /// Trims a name and rejects it if nothing is left.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::EmptyName` for blank names.
    pub fn validate_name(name: &str) -> Result<String, BudgetError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(BudgetError::EmptyName);
        }
        Ok(trimmed.to_string())
    }

    /// Rejects negative amounts.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NegativeAmount` if the amount is below zero.
    pub fn validate_amount(amount: Decimal) -> Result<(), BudgetError> {
        if amount < Decimal::ZERO {
            return Err(BudgetError::NegativeAmount);
        }
        Ok(())
    }
}
