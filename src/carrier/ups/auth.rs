//! UPS OAuth client-credentials token cache
//!
//! The identity endpoint hands out bearer tokens that live for a few hours.
//! One token is kept in memory and reused until it is within
//! [`SAFETY_MARGIN_SECS`] of expiring, so most label requests skip the
//! exchange entirely.

use chrono::{DateTime, Duration, Utc};
use reqwest::{header::ACCEPT, Client};
use serde::{Deserialize, Deserializer};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::carrier::http_client::error_body;
use crate::carrier::traits::{AccessToken, CarrierError, CarrierResult};

/// Remaining lifetime below which a cached token is replaced
pub const SAFETY_MARGIN_SECS: i64 = 60;

/// A token and the absolute time it stops being valid
#[derive(Debug, Clone)]
struct Credential {
    token: String,
    expires_at: DateTime<Utc>,
}

impl Credential {
    fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        !self.token.is_empty() && now < self.expires_at - Duration::seconds(SAFETY_MARGIN_SECS)
    }

    fn ttl_at(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }

    fn to_access_token(&self, now: DateTime<Utc>) -> AccessToken {
        AccessToken {
            token: self.token.clone(),
            ttl_seconds: self.ttl_at(now),
        }
    }
}

/// Identity endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
    /// UPS sends this as a string; other servers send a number
    #[serde(default, deserialize_with = "lenient_seconds")]
    expires_in: i64,
}

fn lenient_seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// Obtains and caches UPS bearer tokens
///
/// The cache lock is held across the exchange, so callers racing on a stale
/// token wait for one exchange instead of each performing their own.
pub struct CredentialManager {
    http: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    timeout: std::time::Duration,
    cache: Mutex<Option<Credential>>,
}

impl CredentialManager {
    pub fn new(
        http: Client,
        token_url: String,
        client_id: String,
        client_secret: String,
        timeout: std::time::Duration,
    ) -> Self {
        CredentialManager {
            http,
            token_url,
            client_id,
            client_secret,
            timeout,
            cache: Mutex::new(None),
        }
    }

    /// Return a usable token, exchanging credentials if needed
    pub async fn get_token(&self) -> CarrierResult<AccessToken> {
        self.get_token_at(Utc::now()).await
    }

    pub(crate) async fn get_token_at(&self, now: DateTime<Utc>) -> CarrierResult<AccessToken> {
        let mut cache = self.cache.lock().await;

        if let Some(credential) = cache.as_ref().filter(|c| c.is_usable_at(now)) {
            debug!(ttl_seconds = credential.ttl_at(now), "Reusing cached UPS token");
            return Ok(credential.to_access_token(now));
        }

        let credential = self.exchange(now).await?;
        let token = credential.to_access_token(now);
        *cache = Some(credential);
        Ok(token)
    }

    async fn exchange(&self, now: DateTime<Utc>) -> CarrierResult<Credential> {
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(CarrierError::NotConfigured(
                "UPS client id and secret must both be set".to_string(),
            ));
        }

        debug!(url = %self.token_url, "Requesting UPS access token");

        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header(ACCEPT, "application/json")
            .form(&[("grant_type", "client_credentials")])
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            warn!(status = status.as_u16(), "UPS token exchange rejected");
            return Err(CarrierError::AuthFailed {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let parsed: TokenResponse = serde_json::from_str(&text)
            .map_err(|e| CarrierError::MalformedResponse(format!("token response: {}", e)))?;

        if parsed.access_token.is_empty() {
            return Err(CarrierError::MalformedResponse(
                "token response has no access_token".to_string(),
            ));
        }

        let expires_at = Duration::try_seconds(parsed.expires_in)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                CarrierError::MalformedResponse(format!(
                    "token expires_in out of range: {}",
                    parsed.expires_in
                ))
            })?;

        info!(expires_in = parsed.expires_in, "Obtained UPS access token");

        Ok(Credential {
            token: parsed.access_token,
            expires_at,
        })
    }
}
