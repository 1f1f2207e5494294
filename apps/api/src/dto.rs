use acesso_domain::User;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for the provider callback.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/sign-in-request.ts"
)]
pub struct SignInRequest {
    /// Authorization code issued by the provider redirect. An absent or
    /// blank value is denied as `missing_code` downstream.
    pub code: Option<String>,
}

/// Resolved user returned on successful sign-in.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/signed-in-user-response.ts"
)]
pub struct SignedInUserResponse {
    pub id: String,
    pub cpf: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub trust_level: String,
}

impl From<User> for SignedInUserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            cpf: user.cpf,
            name: user.name,
            email: user.email,
            trust_level: user.trust_level.as_str().to_owned(),
        }
    }
}

/// Denial payload carrying the stable sign-in error code.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/sign-in-error-response.ts"
)]
pub struct SignInErrorResponse {
    pub error: String,
}

/// Health status of one dependency.
#[derive(Debug, Serialize)]
pub struct HealthDependencyStatus {
    pub status: &'static str,
    pub detail: Option<String>,
}

/// Health endpoint payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ready: bool,
    pub postgres: HealthDependencyStatus,
}
