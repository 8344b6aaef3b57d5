//! QuantConnect API client for the Lean CLI
//!
//! Only the handshake needed by `lean login` is implemented: checking whether
//! a user id and API token are accepted by the API.
//!
//! # Example
//!
//! ```no_run
//! use lean_api::ApiClient;
//!
//! # async fn check() -> Result<(), lean_api::ApiError> {
//! let client = ApiClient::new("123", "my-api-token");
//! if !client.is_authenticated().await? {
//!     eprintln!("Credentials are invalid");
//! }
//! # Ok(())
//! # }
//! ```

use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://www.quantconnect.com/api/v2";

/// Errors returned by [`ApiClient`]
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to reach the QuantConnect API: {0}")]
    Http(#[from] reqwest::Error),

    #[error("QuantConnect API returned status: {0}")]
    Status(reqwest::StatusCode),
}

/// Body shared by every API response
#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    errors: Vec<String>,
}

/// Client making authenticated requests to the QuantConnect API
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    user_id: String,
    api_token: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Create a client for the given credentials
    pub fn new(user_id: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, user_id, api_token)
    }

    /// Create a client talking to a different API root
    pub fn with_base_url(
        base_url: impl Into<String>,
        user_id: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_id: user_id.into(),
            api_token: api_token.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Whether the API accepts this client's credentials
    ///
    /// Rejected credentials are reported as `Ok(false)`; an error means the
    /// API could not be asked.
    pub async fn is_authenticated(&self) -> Result<bool, ApiError> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();

        let url = format!("{}/authenticate", self.base_url);
        log::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.user_id, Some(password(&self.api_token, timestamp)))
            .header("Timestamp", timestamp.to_string())
            .send()
            .await?;

        let status = response.status();
        log::debug!("{} responded with {}", url, status);

        // The API answers bad credentials with an error status instead of a body
        if matches!(status.as_u16(), 401 | 403 | 500) {
            return Ok(false);
        }

        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        let body: ApiResponse = response.json().await?;
        if !body.success {
            log::debug!("Authentication rejected: {}", body.errors.join(", "));
        }

        Ok(body.success)
    }
}

/// The password sent with each request: `sha256("<api token>:<timestamp>")` as hex
fn password(api_token: &str, timestamp: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}:{}", api_token, timestamp).as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hashes_token_with_timestamp() {
        assert_eq!(
            password("secret-token", 1_700_000_000),
            "efd1a989a3eb6a91d45f65c1ab644c8461309bb49925e3e6170f3e8fba191859"
        );
        assert_ne!(
            password("secret-token", 1_700_000_000),
            password("secret-token", 1_700_000_001)
        );
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::with_base_url("http://localhost/api/v2/", "1", "t");
        assert_eq!(client.base_url, "http://localhost/api/v2");
    }

    #[tokio::test]
    async fn unreachable_api_is_an_error() {
        let client = ApiClient::with_base_url("http://127.0.0.1:1", "1", "t");

        assert!(matches!(
            client.is_authenticated().await,
            Err(ApiError::Http(_))
        ));
    }
}
