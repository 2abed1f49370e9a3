//! Expense routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use budgein_core::budget::{CreateExpenseInput, Expense, types::display_date};
use budgein_shared::types::{BudgetId, Currency, ExpenseId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiJson, ApiPath},
};

/// Creates the expense routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route("/expenses/{id}", delete(delete_expense))
}

/// Query for `GET /expenses`.
#[derive(Debug, Default, Deserialize)]
pub struct ExpenseFilter {
    /// Only expenses of the budget with this name.
    pub budget: Option<String>,
}

/// Request body for recording an expense.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    /// Expense label.
    pub name: String,
    /// Amount spent.
    pub amount: Decimal,
    /// Name of the budget to charge.
    pub budget: String,
    /// `dd/mm/yyyy` or `yyyy-mm-dd`; today when absent.
    #[serde(default)]
    pub date: Option<String>,
}

/// An expense with its formatted amount.
#[derive(Debug, Serialize)]
pub struct ExpenseResponse {
    /// Expense ID.
    pub id: ExpenseId,
    /// Expense label.
    pub name: String,
    /// Amount spent.
    pub amount: Decimal,
    /// Formatted `amount`.
    pub amount_display: String,
    /// Owning budget.
    pub budget_id: BudgetId,
    /// Owning budget's name.
    pub budget: String,
    /// Date as `dd/mm/yyyy`.
    pub date: String,
}

impl ExpenseResponse {
    /// Decorates an expense for display in `currency`.
    #[must_use]
    pub fn new(expense: Expense, currency: Currency) -> Self {
        Self {
            amount_display: currency.format(expense.amount),
            date: expense.date.format(display_date::FORMAT).to_string(),
            id: expense.id,
            name: expense.name,
            amount: expense.amount,
            budget_id: expense.budget_id,
            budget: expense.budget,
        }
    }
}

/// GET /expenses?budget= - List expenses, optionally for one budget.
async fn list_expenses(
    State(state): State<AppState>,
    Query(filter): Query<ExpenseFilter>,
) -> Json<Vec<ExpenseResponse>> {
    let expenses = state
        .budgets
        .list_expenses(filter.budget.as_deref())
        .await
        .into_iter()
        .map(|e| ExpenseResponse::new(e, state.currency))
        .collect();
    Json(expenses)
}

/// POST /expenses - Record an expense against a budget.
async fn create_expense(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateExpenseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let date = match payload.date.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(
            display_date::parse(raw)
                .ok_or_else(|| ApiError::validation(format!("Invalid date '{raw}'")))?,
        ),
    };

    let expense = state
        .budgets
        .create_expense(CreateExpenseInput {
            name: payload.name,
            amount: payload.amount,
            budget_name: payload.budget,
            date,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ExpenseResponse::new(expense, state.currency)),
    ))
}

/// DELETE /expenses/{id} - Delete an expense.
async fn delete_expense(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ExpenseId>,
) -> Result<impl IntoResponse, ApiError> {
    let expense = state.budgets.delete_expense(id).await?;

    Ok(Json(json!({
        "message": format!("Expense '{}' deleted", expense.name),
        "id": expense.id,
    })))
}
