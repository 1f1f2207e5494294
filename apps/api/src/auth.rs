use acesso_application::{SignInDenial, SignInOutcome};
use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::dto::{SignInErrorResponse, SignInRequest, SignedInUserResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// POST /auth/govbr/callback - Exchange an authorization code for a local user.
///
/// The only transport knowledge here is the denial-code-to-status table;
/// internal error types never reach this layer.
pub async fn govbr_callback_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<SignInRequest>,
) -> ApiResult<Response> {
    let (ip_address, user_agent) = extract_request_context(&headers);
    let code = payload.code.unwrap_or_default();

    let outcome = state
        .sign_in_service
        .sign_in(&code, ip_address, user_agent)
        .await?;

    Ok(match outcome {
        SignInOutcome::Authenticated(user) => {
            (StatusCode::CREATED, Json(SignedInUserResponse::from(user))).into_response()
        }
        SignInOutcome::Denied(denial) => (
            denial_status(denial),
            Json(SignInErrorResponse {
                error: denial.code().to_owned(),
            }),
        )
            .into_response(),
    })
}

/// Maps each denial to the status the client contract promises.
fn denial_status(denial: SignInDenial) -> StatusCode {
    match denial {
        SignInDenial::MissingCode => StatusCode::UNPROCESSABLE_ENTITY,
        SignInDenial::InvalidToken => StatusCode::UNAUTHORIZED,
        SignInDenial::InsufficientTrustLevel => StatusCode::FORBIDDEN,
        SignInDenial::GatewayUnavailable => StatusCode::SERVICE_UNAVAILABLE,
    }
}

fn extract_request_context(headers: &HeaderMap) -> (Option<String>, Option<String>) {
    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned);

    let user_agent = headers
        .get("user-agent")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned);

    (ip_address, user_agent)
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, StatusCode};

    use super::{SignInDenial, denial_status, extract_request_context};

    #[test]
    fn denial_statuses_match_the_client_contract() {
        assert_eq!(
            denial_status(SignInDenial::MissingCode),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            denial_status(SignInDenial::InvalidToken),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            denial_status(SignInDenial::InsufficientTrustLevel),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            denial_status(SignInDenial::GatewayUnavailable),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn request_context_takes_the_first_forwarded_address() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        headers.insert("user-agent", HeaderValue::from_static("integration-test"));

        let (ip_address, user_agent) = extract_request_context(&headers);
        assert_eq!(ip_address.as_deref(), Some("203.0.113.7"));
        assert_eq!(user_agent.as_deref(), Some("integration-test"));
    }

    #[test]
    fn request_context_tolerates_missing_headers() {
        let headers = HeaderMap::new();
        assert_eq!(extract_request_context(&headers), (None, None));
    }
}
