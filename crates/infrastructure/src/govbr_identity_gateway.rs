//! Token-exchange client for the gov.br OAuth2 token endpoint.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use acesso_application::{ExchangeError, IdentityGateway};
use acesso_core::{AppResult, NonEmptyString};
use acesso_domain::{IdentityClaims, decode_identity_token};

/// Static credentials and endpoint for the token exchange.
///
/// Constructed once at process start; an absent or blank field fails here,
/// never per-request.
#[derive(Clone)]
pub struct GovBrConfig {
    token_url: NonEmptyString,
    client_id: NonEmptyString,
    client_secret: NonEmptyString,
    redirect_uri: NonEmptyString,
}

impl GovBrConfig {
    /// Creates a validated provider configuration.
    pub fn new(
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            token_url: NonEmptyString::new(token_url)?,
            client_id: NonEmptyString::new(client_id)?,
            client_secret: NonEmptyString::new(client_secret)?,
            redirect_uri: NonEmptyString::new(redirect_uri)?,
        })
    }
}

// The client secret must never reach logs.
impl std::fmt::Debug for GovBrConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("GovBrConfig")
            .field("token_url", &self.token_url.as_str())
            .field("client_id", &self.client_id.as_str())
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri.as_str())
            .finish()
    }
}

/// Successful token-endpoint payload; only the identity token is consumed.
#[derive(Debug, Deserialize)]
struct TokenEndpointResponse {
    id_token: Option<String>,
}

/// Production implementation of the identity gateway port.
///
/// One outbound form-encoded POST per invocation; no retries, no caching.
/// The caller-supplied deadline lives on the injected `reqwest::Client`.
#[derive(Clone)]
pub struct GovBrIdentityGateway {
    http_client: reqwest::Client,
    config: GovBrConfig,
}

impl GovBrIdentityGateway {
    /// Creates a gateway from a shared HTTP client and provider config.
    #[must_use]
    pub fn new(http_client: reqwest::Client, config: GovBrConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }
}

#[async_trait]
impl IdentityGateway for GovBrIdentityGateway {
    async fn exchange(&self, authorization_code: &str) -> Result<IdentityClaims, ExchangeError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", authorization_code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];

        let response = self
            .http_client
            .post(self.config.token_url.as_str())
            .form(&params)
            .send()
            .await
            .map_err(|error| {
                warn!(%error, "token exchange transport failure");
                ExchangeError::Unavailable
            })?;

        let status = response.status();
        if !status.is_success() {
            // 5xx and everything else non-success read as "provider down";
            // proceeding on an abnormal answer is never an option.
            warn!(%status, "token endpoint answered with a non-success status");
            return Err(ExchangeError::Unavailable);
        }

        let payload: TokenEndpointResponse = response.json().await.map_err(|error| {
            warn!(%error, "token endpoint body was not decodable");
            ExchangeError::InvalidToken
        })?;

        let id_token = payload
            .id_token
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                warn!("token endpoint answered without an id_token field");
                ExchangeError::InvalidToken
            })?;

        decode_identity_token(&id_token).map_err(|error| {
            warn!(%error, "identity token rejected");
            ExchangeError::InvalidToken
        })
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::post;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    use acesso_application::{ExchangeError, IdentityGateway};
    use acesso_domain::{IdentityClaims, TrustLevel};

    use super::{GovBrConfig, GovBrIdentityGateway};

    fn config(token_url: &str) -> GovBrConfig {
        let config = GovBrConfig::new(
            token_url,
            "client-id",
            "super-secret",
            "https://app.example.com/callback",
        );
        match config {
            Ok(config) => config,
            Err(error) => panic!("config should validate: {error}"),
        }
    }

    /// Serves one canned answer on a loopback port and returns its URL.
    async fn spawn_token_endpoint(status: StatusCode, body: String) -> String {
        let app = Router::new().route(
            "/token",
            post(move || {
                let body = body.clone();
                async move { (status, body) }
            }),
        );

        let listener = match tokio::net::TcpListener::bind("127.0.0.1:0").await {
            Ok(listener) => listener,
            Err(error) => panic!("failed to bind token endpoint: {error}"),
        };
        let address = match listener.local_addr() {
            Ok(address) => address,
            Err(error) => panic!("failed to read token endpoint address: {error}"),
        };

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        format!("http://{address}/token")
    }

    async fn exchange_against(
        status: StatusCode,
        body: String,
    ) -> Result<IdentityClaims, ExchangeError> {
        let token_url = spawn_token_endpoint(status, body).await;
        let gateway = GovBrIdentityGateway::new(reqwest::Client::new(), config(&token_url));
        gateway.exchange("authorization-code").await
    }

    #[tokio::test]
    async fn successful_exchange_decodes_the_identity_token() {
        let payload = serde_json::json!({
            "sub": "12345678900",
            "name": "Maria Silva",
            "selo": { "nivel": "ouro" },
        });
        let id_token = format!(
            "eyJhbGciOiJSUzI1NiJ9.{}.signature",
            URL_SAFE_NO_PAD.encode(payload.to_string())
        );
        let body = serde_json::json!({ "id_token": id_token }).to_string();

        let claims = match exchange_against(StatusCode::OK, body).await {
            Ok(claims) => claims,
            Err(error) => panic!("expected claims, got {error}"),
        };

        assert_eq!(claims.subject(), "12345678900");
        assert_eq!(claims.trust_level(), Some(TrustLevel::Gold));
    }

    #[tokio::test]
    async fn non_success_status_maps_to_unavailable() {
        let server_fault =
            exchange_against(StatusCode::INTERNAL_SERVER_ERROR, "{}".to_owned()).await;
        assert_eq!(server_fault, Err(ExchangeError::Unavailable));

        let rejection = exchange_against(StatusCode::BAD_REQUEST, "{}".to_owned()).await;
        assert_eq!(rejection, Err(ExchangeError::Unavailable));
    }

    #[tokio::test]
    async fn undecodable_body_maps_to_invalid_token() {
        let result = exchange_against(StatusCode::OK, "not json".to_owned()).await;
        assert_eq!(result, Err(ExchangeError::InvalidToken));
    }

    #[tokio::test]
    async fn missing_or_blank_id_token_maps_to_invalid_token() {
        let absent = exchange_against(StatusCode::OK, "{}".to_owned()).await;
        assert_eq!(absent, Err(ExchangeError::InvalidToken));

        let blank =
            exchange_against(StatusCode::OK, r#"{"id_token": "   "}"#.to_owned()).await;
        assert_eq!(blank, Err(ExchangeError::InvalidToken));
    }

    #[tokio::test]
    async fn malformed_id_token_maps_to_invalid_token() {
        let body = r#"{"id_token": "not-a-compact-token"}"#.to_owned();
        let result = exchange_against(StatusCode::OK, body).await;
        assert_eq!(result, Err(ExchangeError::InvalidToken));
    }

    #[tokio::test]
    async fn transport_failure_maps_to_unavailable() {
        // Bind then drop to obtain a port with nothing listening.
        let address = match tokio::net::TcpListener::bind("127.0.0.1:0").await {
            Ok(listener) => match listener.local_addr() {
                Ok(address) => address,
                Err(error) => panic!("failed to read address: {error}"),
            },
            Err(error) => panic!("failed to bind: {error}"),
        };

        let token_url = format!("http://{address}/token");
        let gateway = GovBrIdentityGateway::new(reqwest::Client::new(), config(&token_url));

        let result = gateway.exchange("authorization-code").await;
        assert_eq!(result, Err(ExchangeError::Unavailable));
    }

    #[test]
    fn config_rejects_blank_fields() {
        assert!(GovBrConfig::new("", "client", "secret", "https://app/callback").is_err());
        assert!(GovBrConfig::new("https://sso/token", "client", "  ", "https://app/callback").is_err());
    }

    #[test]
    fn config_debug_redacts_the_client_secret() {
        let config = GovBrConfig::new(
            "https://sso.acesso.gov.br/token",
            "client-id",
            "super-secret",
            "https://app.example.com/callback",
        );
        let rendered = format!("{config:?}");

        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
