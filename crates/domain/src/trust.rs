//! Reliability seal levels asserted by the identity provider, and the
//! admission policy applied to them.

use serde::{Deserialize, Serialize};

use crate::IdentityClaims;

/// Identity-assurance tier asserted by the provider for a verified account.
///
/// The provider names the tiers after medals; the wire and storage strings
/// are its Portuguese vocabulary (`bronze`, `prata`, `ouro`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustLevel {
    /// Self-declared account, weakest assurance.
    Bronze,
    /// Identity validated against a government database (`prata`).
    #[serde(rename = "prata")]
    Silver,
    /// Identity validated in person or via certificate (`ouro`).
    #[serde(rename = "ouro")]
    Gold,
}

impl TrustLevel {
    /// Returns the provider/storage string for this level.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bronze => "bronze",
            Self::Silver => "prata",
            Self::Gold => "ouro",
        }
    }

    /// Parses a provider string into a trust level.
    ///
    /// Returns `None` for anything outside the closed enumeration. Unknown
    /// values fail closed: they never admit and never raise.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "bronze" => Some(Self::Bronze),
            "prata" => Some(Self::Silver),
            "ouro" => Some(Self::Gold),
            _ => None,
        }
    }

    /// Whether this level meets the minimum required for sign-in.
    #[must_use]
    pub fn meets_minimum(&self) -> bool {
        matches!(self, Self::Silver | Self::Gold)
    }
}

impl std::fmt::Display for TrustLevel {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Admission policy over identity claims.
///
/// True iff the subject is non-empty and the trust level is at least
/// `prata`. This is the single allow-list call site; total and pure.
#[must_use]
pub fn is_admissible(claims: &IdentityClaims) -> bool {
    !claims.subject().trim().is_empty()
        && claims.trust_level().is_some_and(|level| level.meets_minimum())
}
