use crate::TrustLevel;

/// Identity claims decoded from a provider token.
///
/// Ephemeral, produced once per sign-in attempt. Absent fields are kept as
/// empty/absent values here; the admission policy, not the parser, decides
/// whether they matter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaims {
    subject: String,
    name: Option<String>,
    email: Option<String>,
    trust_level: Option<TrustLevel>,
}

impl IdentityClaims {
    /// Creates a claims value from already-decoded fields.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        name: Option<String>,
        email: Option<String>,
        trust_level: Option<TrustLevel>,
    ) -> Self {
        Self {
            subject: subject.into(),
            name,
            email,
            trust_level,
        }
    }

    /// Returns the subject identifier (CPF), or an empty string when the
    /// token did not carry one.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the display name, if the provider returned one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the email, if the provider returned one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the asserted trust level, if present and recognized.
    #[must_use]
    pub fn trust_level(&self) -> Option<TrustLevel> {
        self.trust_level
    }
}
