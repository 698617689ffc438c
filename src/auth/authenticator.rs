//! Token provider implementation
//!
//! Signs a client assertion, exchanges it for a bearer token and applies
//! the token to outgoing requests.

use super::types::{AuthConfig, Credential, ORG_CONTEXT_HEADER, SEARCH_ADS_SCOPE};
use crate::error::{Error, Result};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Obtains the bearer credential once and hands it to every request
///
/// The credential is published through a [`OnceCell`], so concurrent callers
/// either wait for the single exchange or observe the finished value.
/// It is kept for the lifetime of the provider even past `expires_at`.
pub struct TokenProvider {
    /// Auth configuration
    config: AuthConfig,
    /// Credential, written once on first use
    credential: OnceCell<Credential>,
    /// HTTP client for the token request
    http_client: Client,
}

impl TokenProvider {
    /// Create a new token provider with the given config
    pub fn new(config: AuthConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    /// Create a token provider with a custom HTTP client
    pub fn with_client(config: AuthConfig, http_client: Client) -> Self {
        Self {
            config,
            credential: OnceCell::new(),
            http_client,
        }
    }

    /// Get the credential, exchanging an assertion on the first call
    pub async fn token(&self) -> Result<&Credential> {
        let credential = self
            .credential
            .get_or_try_init(|| self.exchange())
            .await?;

        if credential.is_expired() {
            debug!(
                "Cached access token passed its expiry ({:?}), reusing it",
                credential.expires_at
            );
        }

        Ok(credential)
    }

    /// Apply bearer and organization context headers to a request builder
    pub async fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        let credential = self.token().await?;
        Ok(req
            .bearer_auth(&credential.token)
            .header(ORG_CONTEXT_HEADER, self.config.org_context()))
    }

    /// Whether the exchange has already happened
    pub fn has_credential(&self) -> bool {
        self.credential.initialized()
    }

    /// Get the current auth config
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Build the ES256 client assertion used as `client_secret`
    pub fn sign_assertion(&self) -> Result<String> {
        let issued_at = Utc::now().timestamp();
        let claims = AssertionClaims {
            sub: self.config.client_id.clone(),
            aud: self.config.audience.clone(),
            iat: issued_at,
            exp: issued_at + self.config.effective_lifetime_seconds(),
            iss: self.config.team_id.clone(),
        };

        let mut header = Header::new(Algorithm::ES256);
        header.kid = Some(self.config.key_id.clone());

        let pem = normalize_pem(&self.config.private_key);
        let encoding_key =
            EncodingKey::from_ec_pem(pem.as_bytes()).map_err(|e| Error::JwtGeneration {
                message: format!("Invalid private key: {e}"),
            })?;

        encode(&header, &claims, &encoding_key).map_err(|e| Error::JwtGeneration {
            message: format!("Failed to encode JWT: {e}"),
        })
    }

    /// Exchange a freshly signed assertion for an access token
    async fn exchange(&self) -> Result<Credential> {
        let client_secret = self.sign_assertion()?;

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("scope", SEARCH_ADS_SCOPE),
        ];

        debug!("Requesting access token from {}", self.config.token_url);
        let response = self
            .http_client
            .post(&self.config.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| Error::auth(format!("Token request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::auth(format!(
                "Token request failed with status {status}: {body}"
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::auth(format!("Invalid token response: {e}")))?;

        let token = token_response
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::auth("Token response did not contain an access_token"))?;

        info!("Obtained access token for client {}", self.config.client_id);
        Ok(Credential::new(token, token_response.expires_in))
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("config", &self.config)
            .field("has_credential", &self.has_credential())
            .finish_non_exhaustive()
    }
}

/// OAuth2 token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Client assertion claims
#[derive(Debug, Serialize)]
struct AssertionClaims {
    sub: String,
    aud: String,
    iat: i64,
    exp: i64,
    iss: String,
}

/// Undo `\n` escaping that PEM keys pick up when stored in JSON config
fn normalize_pem(pem: &str) -> String {
    if pem.contains("\\n") {
        pem.replace("\\n", "\n")
    } else {
        pem.to_string()
    }
}
