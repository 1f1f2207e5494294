//! Local user entity keyed by the provider subject (CPF).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::TrustLevel;

/// Unique identifier for a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random user identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a user identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Persisted user record.
///
/// The CPF is the immutable natural key. Name and email are fixed after
/// creation; only the trust level is refreshed on later sign-ins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Subject identifier from the provider (Brazilian national ID).
    pub cpf: String,
    /// Display name captured at first sign-in, if the provider sent one.
    pub name: Option<String>,
    /// Email captured at first sign-in, if the provider sent one.
    pub email: Option<String>,
    /// Latest observed trust level. Always at least `prata`: users only
    /// exist after passing the admission policy.
    pub trust_level: TrustLevel,
}

/// Profile for a user about to be inserted or refreshed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Subject identifier used as the upsert key.
    pub cpf: String,
    /// Display name for first-time creation.
    pub name: Option<String>,
    /// Email for first-time creation.
    pub email: Option<String>,
    /// Trust level to store or refresh.
    pub trust_level: TrustLevel,
}
