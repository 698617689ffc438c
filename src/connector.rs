//! Connection check
//!
//! A check succeeds when the configured credentials can be exchanged for
//! an access token. No report is requested.

use crate::auth::TokenProvider;
use crate::config::SourceConfig;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

/// Result of a connection check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Whether the check succeeded
    pub success: bool,

    /// Error message if failed
    pub message: Option<String>,
}

impl CheckResult {
    /// Create a successful check result
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    /// Create a failed check result
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }

    /// `CONNECTION_STATUS` message for the CLI
    pub fn to_message(&self) -> Value {
        let status = if self.success { "SUCCEEDED" } else { "FAILED" };
        let message = self
            .message
            .clone()
            .unwrap_or_else(|| "Connection successful".to_string());

        json!({
            "type": "CONNECTION_STATUS",
            "connectionStatus": {
                "status": status,
                "message": message
            }
        })
    }
}

/// Exchange the configured credentials for a token
pub async fn check_connection(config: &SourceConfig) -> CheckResult {
    let provider = TokenProvider::new(config.auth_config());
    match provider.token().await {
        Ok(_) => {
            info!("Connection check succeeded for org {}", config.org_id);
            CheckResult::success()
        }
        Err(e) => {
            warn!("Connection check failed: {e}");
            CheckResult::failure(format!("Connection failed: {e}"))
        }
    }
}
