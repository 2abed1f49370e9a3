//! Authentication routes for register, login, and the current user.
//!
//! There is no logout endpoint: tokens are stateless and the client discards
//! its copy.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use budgein_core::auth::{User, burn_verification, hash_password, verify_password};
use budgein_shared::auth::{AuthResponse, LoginRequest, RegisterRequest, UserInfo};
use budgein_shared::types::UserId;
use tracing::{error, info};
use validator::Validate;

use crate::{AppState, error::ApiError, extractors::ApiJson, middleware::AuthUser};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Creates the public auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
}

/// Creates the auth routes that need a valid token.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

fn user_info(user: &User) -> UserInfo {
    UserInfo {
        id: user.id.into_inner(),
        email: user.email.clone(),
        username: user.username.clone(),
    }
}

fn issue_token(state: &AppState, user: &User) -> Result<AuthResponse, ApiError> {
    let access_token = state
        .jwt_service
        .generate_access_token(user.id.into_inner(), &user.username)
        .map_err(|e| {
            error!(error = %e, "Failed to generate access token");
            ApiError::internal(e.to_string())
        })?;

    Ok(AuthResponse {
        user: user_info(user),
        access_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    })
}

/// POST /auth/register - Create an account and sign it in.
async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let password_hash = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "Failed to hash password");
        ApiError::internal(e.to_string())
    })?;

    let user = state
        .users
        .create(&payload.email, &payload.display_name(), password_hash)
        .await?;

    let response = issue_token(&state, &user)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /auth/login - Verify credentials and return a token.
async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Some(user) = state.users.find_by_email(&payload.email).await else {
        // Keep timing close to the known-user path.
        burn_verification(&payload.password);
        info!("Login attempt for unknown email");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    let valid = verify_password(&payload.password, &user.password_hash).map_err(|e| {
        error!(user_id = %user.id, error = %e, "Password verification error");
        ApiError::internal(e.to_string())
    })?;
    if !valid {
        info!(user_id = %user.id, "Failed login attempt - invalid password");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    info!(user_id = %user.id, "User logged in");
    Ok(Json(issue_token(&state, &user)?))
}

/// GET /auth/me - The signed-in user.
async fn me(State(state): State<AppState>, auth: AuthUser) -> Result<Json<UserInfo>, ApiError> {
    state
        .users
        .find_by_id(UserId::from_uuid(auth.user_id()))
        .await
        .map(|user| Json(user_info(&user)))
        .ok_or_else(|| ApiError::unauthorized("Account no longer exists"))
}
