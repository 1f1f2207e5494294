use std::sync::Arc;

use async_trait::async_trait;

use acesso_core::AppResult;

/// Sign-in audit entry for security analytics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEvent {
    /// Subject (CPF) when the attempt progressed far enough to know it.
    pub subject: Option<String>,
    /// Stable event type identifier.
    pub event_type: String,
    /// Outcome label: `success` or a denial code.
    pub outcome: String,
    /// Caller IP address if available.
    pub ip_address: Option<String>,
    /// Caller user-agent if available.
    pub user_agent: Option<String>,
}

impl AuthEvent {
    /// Builds an audit entry for one provider sign-in attempt.
    #[must_use]
    pub fn sign_in(
        subject: Option<String>,
        outcome: &str,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            subject,
            event_type: "govbr_sign_in".to_owned(),
            outcome: outcome.to_owned(),
            ip_address,
            user_agent,
        }
    }
}

/// Repository port for auth event persistence.
#[async_trait]
pub trait AuthEventRepository: Send + Sync {
    /// Appends an auth event entry.
    async fn append_event(&self, event: AuthEvent) -> AppResult<()>;
}

/// Application service for auth event recording.
#[derive(Clone)]
pub struct AuthEventService {
    repository: Arc<dyn AuthEventRepository>,
}

impl AuthEventService {
    /// Creates a service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn AuthEventRepository>) -> Self {
        Self { repository }
    }

    /// Persists an auth event.
    pub async fn record_event(&self, event: AuthEvent) -> AppResult<()> {
        self.repository.append_event(event).await
    }
}
