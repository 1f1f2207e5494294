//! Acesso API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod auth;
mod dto;
mod error;
mod handlers;
mod state;

use std::sync::Arc;
use std::time::Duration;

use acesso_application::{AuthEventService, SignInService};
use acesso_core::AppError;
use acesso_infrastructure::{
    GovBrConfig, GovBrIdentityGateway, PostgresAuthEventRepository, PostgresUserRepository,
};
use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if config.migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    // One shared client; its timeout is the deadline for every token
    // exchange, which performs no retries of its own.
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

    let govbr_config = GovBrConfig::new(
        config.govbr_token_url.clone(),
        config.govbr_client_id.clone(),
        config.govbr_client_secret.clone(),
        config.govbr_redirect_uri.clone(),
    )?;
    let gateway = Arc::new(GovBrIdentityGateway::new(http_client, govbr_config));

    let user_repository = Arc::new(PostgresUserRepository::new(pool.clone()));
    let auth_event_repository = Arc::new(PostgresAuthEventRepository::new(pool.clone()));
    let sign_in_service = SignInService::new(
        gateway,
        user_repository,
        AuthEventService::new(auth_event_repository),
    );

    let app_state = AppState {
        sign_in_service,
        postgres_pool: pool,
    };

    let cors_layer = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(&config.frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    let app = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/govbr/callback", post(auth::govbr_callback_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state);

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "acesso-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
