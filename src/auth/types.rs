//! Auth configuration types
//!
//! These types describe the client-credentials assertion flow and the
//! credential it produces.

use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// Maximum assertion lifetime accepted by the identity service (180 days)
pub const MAX_ASSERTION_LIFETIME_SECONDS: i64 = 86_400 * 180;

/// Scope requested for the reporting audience
pub const SEARCH_ADS_SCOPE: &str = "searchadsorg";

/// Default token endpoint
pub const DEFAULT_TOKEN_URL: &str = "https://appleid.apple.com/auth/oauth2/token";

/// Default assertion audience (the token issuer host)
pub const DEFAULT_AUDIENCE: &str = "https://appleid.apple.com";

/// Header carrying the organization context on every API call
pub const ORG_CONTEXT_HEADER: &str = "X-AP-Context";

/// Settings for the signed-assertion client-credentials exchange
#[derive(Clone)]
pub struct AuthConfig {
    /// Token endpoint URL
    pub token_url: String,
    /// Assertion audience (aud claim)
    pub audience: String,
    /// Client ID (sub claim and form field)
    pub client_id: String,
    /// Team ID (iss claim)
    pub team_id: String,
    /// Key ID (kid header)
    pub key_id: String,
    /// Organization ID sent in the context header
    pub org_id: String,
    /// EC P-256 private key in PEM format
    pub private_key: String,
    /// Assertion lifetime in seconds, clamped to the 180 day maximum
    pub assertion_lifetime_seconds: i64,
}

impl AuthConfig {
    /// Create a config with the default endpoint, audience and lifetime
    pub fn new(
        client_id: impl Into<String>,
        team_id: impl Into<String>,
        key_id: impl Into<String>,
        org_id: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        Self {
            token_url: DEFAULT_TOKEN_URL.to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
            client_id: client_id.into(),
            team_id: team_id.into(),
            key_id: key_id.into(),
            org_id: org_id.into(),
            private_key: private_key.into(),
            assertion_lifetime_seconds: MAX_ASSERTION_LIFETIME_SECONDS,
        }
    }

    /// Override the token endpoint
    #[must_use]
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Override the assertion audience
    #[must_use]
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = audience.into();
        self
    }

    /// Value of the organization context header
    pub fn org_context(&self) -> String {
        format!("orgId={}", self.org_id)
    }

    /// Lifetime actually used for the assertion
    pub fn effective_lifetime_seconds(&self) -> i64 {
        self.assertion_lifetime_seconds
            .clamp(1, MAX_ASSERTION_LIFETIME_SECONDS)
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_url", &self.token_url)
            .field("audience", &self.audience)
            .field("client_id", &self.client_id)
            .field("team_id", &self.team_id)
            .field("key_id", &self.key_id)
            .field("org_id", &self.org_id)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Bearer credential obtained from the token exchange
#[derive(Debug, Clone)]
pub struct Credential {
    /// The access token
    pub token: String,
    /// When the token was obtained
    pub issued_at: DateTime<Utc>,
    /// When the token expires, if the server said so
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    /// Create a credential issued now
    pub fn new(token: String, expires_in_seconds: Option<i64>) -> Self {
        let issued_at = Utc::now();
        Self {
            token,
            issued_at,
            expires_at: expires_in_seconds.map(|secs| issued_at + Duration::seconds(secs)),
        }
    }

    /// Check if the server-reported lifetime has elapsed
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|expires_at| Utc::now() >= expires_at)
    }
}
