//! Budget data types.

use budgein_shared::types::{BudgetId, ExpenseId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A named allocation of funds with a tracked cumulative spend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Budget ID.
    pub id: BudgetId,
    /// Budget name, unique across budgets.
    pub name: String,
    /// Allocated amount.
    pub amount: Decimal,
    /// Sum of the amounts of attached expenses.
    #[serde(default)]
    pub spent: Decimal,
}

/// A single recorded outflow attributed to one budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Expense ID.
    pub id: ExpenseId,
    /// Expense label.
    pub name: String,
    /// Amount spent.
    pub amount: Decimal,
    /// Owning budget.
    #[serde(default)]
    pub budget_id: BudgetId,
    /// Owning budget's current name.
    pub budget: String,
    /// Date the expense was recorded.
    #[serde(with = "display_date")]
    pub date: NaiveDate,
}

/// Both collections, in insertion order, as written to persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// All budgets.
    pub budgets: Vec<Budget>,
    /// All expenses.
    pub expenses: Vec<Expense>,
}

/// Input for creating a new budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetInput {
    /// Budget name.
    pub name: String,
    /// Allocated amount.
    pub amount: Decimal,
}

/// Input for editing a budget. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateBudgetInput {
    /// New name.
    pub name: Option<String>,
    /// New allocated amount.
    pub amount: Option<Decimal>,
}

/// Input for recording an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    /// Expense label.
    pub name: String,
    /// Amount spent.
    pub amount: Decimal,
    /// Name of the budget to charge.
    pub budget_name: String,
    /// Date of the expense; today when absent.
    pub date: Option<NaiveDate>,
}

/// Serde adapter for `dd/mm/yyyy` dates.
///
/// ISO `yyyy-mm-dd` is accepted on input as well.
pub mod display_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    /// Display format used for expense dates.
    pub const FORMAT: &str = "%d/%m/%Y";

    /// Parses either `dd/mm/yyyy` or `yyyy-mm-dd`.
    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        NaiveDate::parse_from_str(raw, FORMAT)
            .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
            .ok()
    }

    /// Serializes a date as `dd/mm/yyyy`.
    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(FORMAT))
    }

    /// Deserializes a date from `dd/mm/yyyy` or `yyyy-mm-dd`.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid date '{raw}'")))
    }
}
