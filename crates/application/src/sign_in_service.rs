//! Sign-in orchestration: code exchange, admission, user resolution.
//!
//! This is the single point where typed failures from the gateway and the
//! parser are translated into stable client-facing codes. Nothing below
//! the HTTP layer ever inspects error types other than through
//! [`SignInDenial::code`].

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use acesso_core::AppResult;
use acesso_domain::{IdentityClaims, NewUser, TrustLevel, User, is_admissible};

use crate::{AuthEvent, AuthEventService};

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Failure exchanging an authorization code for identity claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExchangeError {
    /// The provider answered but its identity token was malformed or
    /// undecodable.
    #[error("identity token is malformed or undecodable")]
    InvalidToken,

    /// The provider was unreachable or answered with a non-success status.
    #[error("identity provider is unavailable")]
    Unavailable,
}

/// Port for trading an authorization code for verified identity claims.
///
/// The production implementor performs one network call per invocation;
/// test doubles are the only other implementors.
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Exchanges an authorization code for the claims carried by the
    /// provider's identity token.
    async fn exchange(&self, authorization_code: &str) -> Result<IdentityClaims, ExchangeError>;
}

/// Repository port for user persistence keyed by CPF.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by their CPF.
    async fn find_by_cpf(&self, cpf: &str) -> AppResult<Option<User>>;

    /// Inserts the user if absent, otherwise refreshes only the trust
    /// level. Must be atomic on the CPF unique key: concurrent first-time
    /// sign-ins for one CPF resolve to exactly one row.
    async fn upsert_by_cpf(&self, profile: NewUser) -> AppResult<User>;
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Reason a sign-in attempt was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInDenial {
    /// The caller sent an absent or blank authorization code.
    MissingCode,
    /// The provider's identity token could not be decoded.
    InvalidToken,
    /// The asserted trust level is below the policy minimum.
    InsufficientTrustLevel,
    /// The provider was unavailable or answered abnormally.
    GatewayUnavailable,
}

impl SignInDenial {
    /// Returns the stable client-facing code for this denial.
    ///
    /// These strings are a wire contract; clients branch on them.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingCode => "missing_code",
            Self::InvalidToken => "invalid_token",
            Self::InsufficientTrustLevel => "insufficient_trust_level",
            Self::GatewayUnavailable => "gateway_error",
        }
    }
}

/// Uniform result of a sign-in attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInOutcome {
    /// The identity was admitted and mapped to a local user.
    Authenticated(User),
    /// The attempt was denied with a stable code.
    Denied(SignInDenial),
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service orchestrating provider sign-in.
#[derive(Clone)]
pub struct SignInService {
    gateway: Arc<dyn IdentityGateway>,
    user_repository: Arc<dyn UserRepository>,
    auth_event_service: AuthEventService,
}

impl SignInService {
    /// Creates a new sign-in service.
    #[must_use]
    pub fn new(
        gateway: Arc<dyn IdentityGateway>,
        user_repository: Arc<dyn UserRepository>,
        auth_event_service: AuthEventService,
    ) -> Self {
        Self {
            gateway,
            user_repository,
            auth_event_service,
        }
    }

    /// Signs a user in from an authorization code.
    ///
    /// Single pass: exchange, admission, user resolution. Every failure
    /// mode of the flow itself lands in [`SignInOutcome::Denied`]; only
    /// store/audit faults surface as `Err`.
    pub async fn sign_in(
        &self,
        authorization_code: &str,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> AppResult<SignInOutcome> {
        if authorization_code.trim().is_empty() {
            // Denied before any network traffic.
            return self
                .deny(SignInDenial::MissingCode, None, ip_address, user_agent)
                .await;
        }

        let claims = match self.gateway.exchange(authorization_code).await {
            Ok(claims) => claims,
            Err(ExchangeError::InvalidToken) => {
                return self
                    .deny(SignInDenial::InvalidToken, None, ip_address, user_agent)
                    .await;
            }
            Err(ExchangeError::Unavailable) => {
                return self
                    .deny(
                        SignInDenial::GatewayUnavailable,
                        None,
                        ip_address,
                        user_agent,
                    )
                    .await;
            }
        };

        let Some(trust_level) = claims.trust_level().filter(|_| is_admissible(&claims)) else {
            return self
                .deny(
                    SignInDenial::InsufficientTrustLevel,
                    known_subject(&claims),
                    ip_address,
                    user_agent,
                )
                .await;
        };

        let user = self.resolve_user(&claims, trust_level).await?;

        self.auth_event_service
            .record_event(AuthEvent::sign_in(
                Some(user.cpf.clone()),
                "success",
                ip_address,
                user_agent,
            ))
            .await?;

        Ok(SignInOutcome::Authenticated(user))
    }

    /// Finds or upserts the user for admitted claims.
    ///
    /// The read-first path skips the write entirely when the stored trust
    /// level already matches; atomicity of the racing case belongs to the
    /// repository's upsert.
    async fn resolve_user(
        &self,
        claims: &IdentityClaims,
        trust_level: TrustLevel,
    ) -> AppResult<User> {
        // Admission judges the trimmed subject; storage must key on the
        // same form or a padded variant would create a duplicate row.
        let cpf = claims.subject().trim();

        if let Some(existing) = self.user_repository.find_by_cpf(cpf).await?
            && existing.trust_level == trust_level
        {
            return Ok(existing);
        }

        self.user_repository
            .upsert_by_cpf(NewUser {
                cpf: cpf.to_owned(),
                name: claims.name().map(ToOwned::to_owned),
                email: claims.email().map(ToOwned::to_owned),
                trust_level,
            })
            .await
    }

    async fn deny(
        &self,
        denial: SignInDenial,
        subject: Option<String>,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> AppResult<SignInOutcome> {
        self.auth_event_service
            .record_event(AuthEvent::sign_in(
                subject,
                denial.code(),
                ip_address,
                user_agent,
            ))
            .await?;

        Ok(SignInOutcome::Denied(denial))
    }
}

fn known_subject(claims: &IdentityClaims) -> Option<String> {
    let subject = claims.subject().trim();
    (!subject.is_empty()).then(|| subject.to_owned())
}
