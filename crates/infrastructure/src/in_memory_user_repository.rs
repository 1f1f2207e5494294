//! In-memory user repository for tests and local development.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use acesso_application::UserRepository;
use acesso_core::{AppError, AppResult};
use acesso_domain::{NewUser, User, UserId};

/// In-memory implementation of the user repository port.
///
/// A single mutex makes the upsert atomic, matching the contract the
/// Postgres adapter gets from its unique constraint.
#[derive(Default)]
pub struct InMemoryUserRepository {
    rows: Mutex<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored users.
    pub fn user_count(&self) -> AppResult<usize> {
        Ok(self.lock_rows()?.len())
    }

    fn lock_rows(&self) -> AppResult<std::sync::MutexGuard<'_, HashMap<String, User>>> {
        self.rows
            .lock()
            .map_err(|error| AppError::Internal(format!("failed to lock user rows: {error}")))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_cpf(&self, cpf: &str) -> AppResult<Option<User>> {
        Ok(self.lock_rows()?.get(cpf).cloned())
    }

    async fn upsert_by_cpf(&self, profile: NewUser) -> AppResult<User> {
        let mut rows = self.lock_rows()?;

        let user = rows
            .entry(profile.cpf.clone())
            .and_modify(|existing| existing.trust_level = profile.trust_level)
            .or_insert_with(|| User {
                id: UserId::new(),
                cpf: profile.cpf.clone(),
                name: profile.name.clone(),
                email: profile.email.clone(),
                trust_level: profile.trust_level,
            })
            .clone();

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use acesso_domain::TrustLevel;

    use super::*;

    fn profile(trust_level: TrustLevel) -> NewUser {
        NewUser {
            cpf: "12345678900".to_owned(),
            name: Some("Maria Silva".to_owned()),
            email: Some("maria@example.com".to_owned()),
            trust_level,
        }
    }

    #[tokio::test]
    async fn upsert_creates_a_user_once() {
        let repository = InMemoryUserRepository::new();

        let created = repository.upsert_by_cpf(profile(TrustLevel::Silver)).await;
        let created = match created {
            Ok(user) => user,
            Err(error) => panic!("upsert failed: {error}"),
        };

        assert_eq!(created.trust_level, TrustLevel::Silver);
        assert_eq!(repository.user_count().unwrap_or(0), 1);
    }

    #[tokio::test]
    async fn upsert_refreshes_trust_level_only() {
        let repository = InMemoryUserRepository::new();
        let _ = repository.upsert_by_cpf(profile(TrustLevel::Silver)).await;

        let mut upgraded = profile(TrustLevel::Gold);
        upgraded.name = Some("Outro Nome".to_owned());
        upgraded.email = Some("outro@example.com".to_owned());

        let refreshed = match repository.upsert_by_cpf(upgraded).await {
            Ok(user) => user,
            Err(error) => panic!("upsert failed: {error}"),
        };

        assert_eq!(refreshed.trust_level, TrustLevel::Gold);
        assert_eq!(refreshed.name.as_deref(), Some("Maria Silva"));
        assert_eq!(refreshed.email.as_deref(), Some("maria@example.com"));
        assert_eq!(repository.user_count().unwrap_or(0), 1);
    }

    #[tokio::test]
    async fn find_returns_none_for_unknown_cpf() {
        let repository = InMemoryUserRepository::new();
        assert_eq!(repository.find_by_cpf("00000000000").await.ok(), Some(None));
    }
}
