//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use sqlx::PgPool;

use acesso_application::UserRepository;
use acesso_core::{AppError, AppResult};
use acesso_domain::{NewUser, TrustLevel, User, UserId};

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: uuid::Uuid,
    cpf: String,
    name: Option<String>,
    email: Option<String>,
    trust_level: String,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let trust_level = TrustLevel::parse(&row.trust_level).ok_or_else(|| {
            AppError::Internal(format!(
                "users row {} carries unknown trust level '{}'",
                row.id, row.trust_level
            ))
        })?;

        Ok(Self {
            id: UserId::from_uuid(row.id),
            cpf: row.cpf,
            name: row.name,
            email: row.email,
            trust_level,
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_cpf(&self, cpf: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, cpf, name, email, trust_level
            FROM users
            WHERE cpf = $1
            LIMIT 1
            "#,
        )
        .bind(cpf)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user by cpf: {error}")))?;

        row.map(User::try_from).transpose()
    }

    async fn upsert_by_cpf(&self, profile: NewUser) -> AppResult<User> {
        // The unique constraint on cpf arbitrates racing first-time
        // sign-ins: losers land in the DO UPDATE arm and observe the
        // winner's row. Name and email are fixed after creation.
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, cpf, name, email, trust_level)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (cpf) DO UPDATE
            SET trust_level = EXCLUDED.trust_level,
                updated_at = now()
            RETURNING id, cpf, name, email, trust_level
            "#,
        )
        .bind(UserId::new().as_uuid())
        .bind(&profile.cpf)
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(profile.trust_level.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to upsert user by cpf: {error}")))?;

        User::try_from(row)
    }
}
