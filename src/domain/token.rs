//! Cached OAuth2 access token with expiry tracking.

use chrono::{DateTime, Utc};

/// Safety margin subtracted from the token lifetime so a token is never
/// presented within a minute of its server-side expiry.
const EXPIRY_MARGIN_MS: i64 = 60_000;

/// A bearer token obtained through the client-credentials grant.
///
/// One instance lives in the [`CredentialBroker`](crate::service::CredentialBroker)
/// cache at a time; refresh replaces it wholesale.
#[derive(Debug, Clone)]
pub struct AccessToken {
    access_token: String,
    token_type: String,
    expires_in_secs: u64,
    issued_at: DateTime<Utc>,
}

impl AccessToken {
    /// Create a token stamped `issued_at = now`.
    pub fn new(
        access_token: impl Into<String>,
        token_type: impl Into<String>,
        expires_in_secs: u64,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: token_type.into(),
            expires_in_secs,
            issued_at: Utc::now(),
        }
    }

    /// Override the issue timestamp. Used to seed brokers in tests.
    #[must_use]
    pub fn with_issued_at(mut self, issued_at: DateTime<Utc>) -> Self {
        self.issued_at = issued_at;
        self
    }

    #[must_use]
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Whether the token has outlived its lifetime minus the safety margin.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Expiry check against an explicit clock reading.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        let age_ms = now.signed_duration_since(self.issued_at).num_milliseconds();
        age_ms > (self.expires_in_secs as i64).saturating_mul(1_000) - EXPIRY_MARGIN_MS
    }

    /// Render the `Authorization` header value: `"<type> <token>"`.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}
