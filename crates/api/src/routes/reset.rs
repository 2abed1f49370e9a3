//! Reset route.

use axum::{Json, Router, extract::State, routing::delete};
use serde_json::{Value, json};
use tracing::info;

use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the reset route (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/reset", delete(reset_all))
}

/// DELETE /reset - Delete every budget and expense. Accounts are kept.
async fn reset_all(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Value>, ApiError> {
    info!(user_id = %auth.user_id(), username = auth.username(), "Reset requested");
    state.budgets.reset_all().await?;
    Ok(Json(json!({ "message": "All budgets and expenses deleted" })))
}
