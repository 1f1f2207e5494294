//! PostgreSQL-backed repository for sign-in audit events.

use async_trait::async_trait;
use sqlx::PgPool;

use acesso_application::{AuthEvent, AuthEventRepository};
use acesso_core::{AppError, AppResult};

/// PostgreSQL implementation of the auth event repository port.
#[derive(Clone)]
pub struct PostgresAuthEventRepository {
    pool: PgPool,
}

impl PostgresAuthEventRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthEventRepository for PostgresAuthEventRepository {
    async fn append_event(&self, event: AuthEvent) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO auth_events (subject, event_type, outcome, ip_address, user_agent)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(event.subject)
        .bind(event.event_type)
        .bind(event.outcome)
        .bind(event.ip_address)
        .bind(event.user_agent)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to append auth event: {error}")))?;

        Ok(())
    }
}
