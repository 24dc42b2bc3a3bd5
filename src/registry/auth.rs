// ABOUTME: OAuth access tokens for Artifact Registry calls.
// ABOUTME: Uses a configured token, the environment, or the GCE metadata server.

use parking_lot::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

use super::models::MetadataToken;
use super::ops::RegistryError;

/// Environment variable holding a pre-issued access token.
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// Token endpoint of the default service account on GCE/GKE/Cloud Run.
pub const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Refresh metadata tokens this long before they expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Source of bearer tokens.
pub enum AccessToken {
    /// A token supplied up front. Never refreshed.
    Fixed(String),
    /// Tokens fetched (and cached) from the metadata server.
    Metadata {
        url: String,
        cached: Mutex<Option<CachedToken>>,
    },
}

pub struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    pub fn fixed(token: impl Into<String>) -> Self {
        AccessToken::Fixed(token.into())
    }

    pub fn metadata() -> Self {
        Self::metadata_at(METADATA_TOKEN_URL)
    }

    pub fn metadata_at(url: impl Into<String>) -> Self {
        AccessToken::Metadata {
            url: url.into(),
            cached: Mutex::new(None),
        }
    }

    /// Pick a token source: an explicit token wins, then `GOOGLE_OAUTH_ACCESS_TOKEN`,
    /// then the metadata server.
    pub fn discover(explicit: Option<String>) -> Self {
        if let Some(token) = explicit.filter(|t| !t.trim().is_empty()) {
            return Self::fixed(token);
        }
        match std::env::var(ACCESS_TOKEN_ENV) {
            Ok(token) if !token.trim().is_empty() => {
                debug!("using access token from {}", ACCESS_TOKEN_ENV);
                Self::fixed(token)
            }
            _ => Self::metadata(),
        }
    }

    /// Current bearer token, fetching a fresh one if needed.
    pub async fn bearer(&self, http: &reqwest::Client) -> Result<String, RegistryError> {
        match self {
            AccessToken::Fixed(token) => {
                if token.trim().is_empty() {
                    return Err(RegistryError::Auth("access token is empty".to_string()));
                }
                Ok(token.trim().to_string())
            }
            AccessToken::Metadata { url, cached } => {
                let still_valid = {
                    let guard = cached.lock();
                    guard
                        .as_ref()
                        .filter(|token| Instant::now() + EXPIRY_MARGIN < token.expires_at)
                        .map(|token| token.value.clone())
                };
                if let Some(value) = still_valid {
                    return Ok(value);
                }

                let fresh = fetch_metadata_token(http, url).await?;
                let value = fresh.value.clone();
                *cached.lock() = Some(fresh);
                Ok(value)
            }
        }
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessToken::Fixed(_) => f.write_str("AccessToken::Fixed(<redacted>)"),
            AccessToken::Metadata { url, .. } => {
                f.debug_struct("AccessToken::Metadata").field("url", url).finish()
            }
        }
    }
}

async fn fetch_metadata_token(
    http: &reqwest::Client,
    url: &str,
) -> Result<CachedToken, RegistryError> {
    debug!("fetching access token from metadata server at {}", url);

    let response = http
        .get(url)
        .header("Metadata-Flavor", "Google")
        .send()
        .await
        .map_err(|e| RegistryError::Auth(format!("metadata server unreachable: {}", e)))?;

    if !response.status().is_success() {
        return Err(RegistryError::Auth(format!(
            "metadata server returned {}",
            response.status()
        )));
    }

    let token: MetadataToken = response
        .json()
        .await
        .map_err(|e| RegistryError::Auth(format!("invalid metadata token response: {}", e)))?;

    Ok(CachedToken {
        value: token.access_token,
        expires_at: Instant::now() + Duration::from_secs(token.expires_in),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_token_is_returned_trimmed() {
        let http = reqwest::Client::new();
        let token = AccessToken::fixed(" ya29.token \n");
        assert_eq!(token.bearer(&http).await.unwrap(), "ya29.token");
    }

    #[tokio::test]
    async fn empty_fixed_token_is_an_auth_error() {
        let http = reqwest::Client::new();
        let err = AccessToken::fixed("  ").bearer(&http).await.unwrap_err();
        assert!(matches!(err, RegistryError::Auth(_)));
    }

    #[test]
    fn explicit_token_wins_over_environment() {
        temp_env::with_var(ACCESS_TOKEN_ENV, Some("from-env"), || {
            let token = AccessToken::discover(Some("explicit".to_string()));
            assert!(matches!(token, AccessToken::Fixed(ref t) if t == "explicit"));
        });
    }

    #[test]
    fn environment_token_used_when_not_configured() {
        temp_env::with_var(ACCESS_TOKEN_ENV, Some("from-env"), || {
            let token = AccessToken::discover(None);
            assert!(matches!(token, AccessToken::Fixed(ref t) if t == "from-env"));
        });
    }

    #[test]
    fn falls_back_to_metadata_server() {
        temp_env::with_var_unset(ACCESS_TOKEN_ENV, || {
            let token = AccessToken::discover(Some(String::new()));
            assert!(matches!(token, AccessToken::Metadata { ref url, .. } if url == METADATA_TOKEN_URL));
        });
    }

    #[test]
    fn debug_output_redacts_fixed_token() {
        let token = AccessToken::fixed("secret");
        assert!(!format!("{:?}", token).contains("secret"));
    }
}
