use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use acesso_core::AppError;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Process configuration resolved once at startup.
///
/// Every provider field is required; a missing credential is a startup
/// failure, never a per-request one.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub govbr_token_url: String,
    pub govbr_client_id: String,
    pub govbr_client_secret: String,
    pub govbr_redirect_uri: String,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_env("DATABASE_URL")?;
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let govbr_token_url = required_url_env("GOVBR_TOKEN_URL")?;
        let govbr_client_id = required_non_empty_env("GOVBR_CLIENT_ID")?;
        let govbr_client_secret = required_non_empty_env("GOVBR_CLIENT_SECRET")?;
        let govbr_redirect_uri = required_url_env("GOVBR_REDIRECT_URI")?;

        Ok(Self {
            migrate_only,
            database_url,
            frontend_url,
            api_host,
            api_port,
            govbr_token_url,
            govbr_client_id,
            govbr_client_secret,
            govbr_redirect_uri,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn required_url_env(name: &str) -> Result<String, AppError> {
    let value = required_non_empty_env(name)?;
    Url::parse(&value)
        .map_err(|error| AppError::Validation(format!("{name} is not a valid URL: {error}")))?;

    Ok(value)
}
