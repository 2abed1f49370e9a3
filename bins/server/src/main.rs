//! BudgeIn API Server
//!
//! Main entry point for the BudgeIn backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use budgein_api::{AppState, create_router};
use budgein_shared::{AppConfig, JwtConfig, JwtService};
use budgein_store::{BudgetStore, UserRepository, connect};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "budgein=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let persistence = connect(&config.storage).await?;
    let budgets = BudgetStore::open(Arc::clone(&persistence)).await?;
    let users = UserRepository::open(persistence).await?;

    let jwt_config = JwtConfig {
        secret: config.jwt.secret.clone(),
        access_token_expires_minutes: config.jwt.access_token_expiry_minutes(),
    };

    let state = AppState {
        budgets: Arc::new(budgets),
        users: Arc::new(users),
        jwt_service: Arc::new(JwtService::new(jwt_config)),
        currency: config.display.currency,
    };
    info!(currency = %state.currency, "Display currency configured");

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
