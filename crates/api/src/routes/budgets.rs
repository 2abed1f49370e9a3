//! Budget management routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use budgein_core::budget::{Budget, BudgetService, CreateBudgetInput, UpdateBudgetInput};
use budgein_shared::types::{BudgetId, Currency};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiJson, ApiPath},
};

/// Creates the budget routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budgets", get(list_budgets).post(create_budget))
        .route("/budgets/{id}", put(update_budget).delete(delete_budget))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a budget.
#[derive(Debug, Deserialize)]
pub struct CreateBudgetRequest {
    /// Budget name.
    pub name: String,
    /// Allocated amount.
    pub amount: Decimal,
}

/// Request body for updating a budget. Absent fields stay unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBudgetRequest {
    /// New name.
    pub name: Option<String>,
    /// New allocated amount.
    pub amount: Option<Decimal>,
}

/// A budget with its derived display values.
#[derive(Debug, Serialize)]
pub struct BudgetResponse {
    /// Budget ID.
    pub id: BudgetId,
    /// Budget name.
    pub name: String,
    /// Allocated amount.
    pub amount: Decimal,
    /// Sum of attached expenses.
    pub spent: Decimal,
    /// `amount - spent`; negative when overspent.
    pub remaining: Decimal,
    /// Spent share in percent, 0 to 100.
    pub percentage: Decimal,
    /// Formatted `amount`.
    pub amount_display: String,
    /// Formatted `spent`.
    pub spent_display: String,
    /// Formatted `remaining`.
    pub remaining_display: String,
}

impl BudgetResponse {
    /// Decorates a budget for display in `currency`.
    #[must_use]
    pub fn new(budget: Budget, currency: Currency) -> Self {
        let remaining = BudgetService::remaining(&budget);
        Self {
            percentage: BudgetService::percentage(&budget),
            amount_display: currency.format(budget.amount),
            spent_display: currency.format(budget.spent),
            remaining_display: currency.format(remaining),
            remaining,
            id: budget.id,
            name: budget.name,
            amount: budget.amount,
            spent: budget.spent,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /budgets - List budgets in creation order.
async fn list_budgets(State(state): State<AppState>) -> Json<Vec<BudgetResponse>> {
    let budgets = state
        .budgets
        .list_budgets()
        .await
        .into_iter()
        .map(|b| BudgetResponse::new(b, state.currency))
        .collect();
    Json(budgets)
}

/// POST /budgets - Create a budget.
async fn create_budget(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateBudgetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let budget = state
        .budgets
        .create_budget(CreateBudgetInput {
            name: payload.name,
            amount: payload.amount,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(BudgetResponse::new(budget, state.currency)),
    ))
}

/// PUT /budgets/{id} - Rename and/or re-allocate a budget.
async fn update_budget(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<BudgetId>,
    ApiJson(payload): ApiJson<UpdateBudgetRequest>,
) -> Result<Json<BudgetResponse>, ApiError> {
    let budget = state
        .budgets
        .update_budget(
            id,
            UpdateBudgetInput {
                name: payload.name,
                amount: payload.amount,
            },
        )
        .await?;

    Ok(Json(BudgetResponse::new(budget, state.currency)))
}

/// DELETE /budgets/{id} - Delete a budget and its expenses.
async fn delete_budget(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<BudgetId>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.budgets.delete_budget(id).await?;

    Ok(Json(json!({
        "message": format!("Budget '{}' deleted", deleted.budget.name),
        "id": deleted.budget.id,
        "expenses_deleted": deleted.expenses.len(),
    })))
}
