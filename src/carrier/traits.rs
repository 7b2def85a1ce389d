//! Carrier trait definitions
//!
//! A carrier turns a [`ShipmentRequest`] into a [`ShipmentResult`]. The label
//! service only talks to this trait, so the UPS specifics stay inside
//! `carrier::ups`.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ShipmentRequest, ShipmentResult};

// ============================================================================
// Error Types
// ============================================================================

/// Carrier error types
#[derive(Debug, Error)]
pub enum CarrierError {
    /// Client credentials or other server-side settings are missing
    #[error("Carrier not configured: {0}")]
    NotConfigured(String),

    /// The identity endpoint refused the client-credentials exchange
    #[error("UPS OAuth failed with status {status}: {body}")]
    AuthFailed { status: u16, body: String },

    /// The shipping endpoint answered with a non-success status
    #[error("UPS API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Success status, but the body is unusable
    #[error("Malformed carrier response: {0}")]
    MalformedResponse(String),

    /// Connection, TLS or timeout failure
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Result type for carrier operations
pub type CarrierResult<T> = Result<T, CarrierError>;

// ============================================================================
// Credentials
// ============================================================================

/// A bearer token together with its remaining lifetime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub ttl_seconds: i64,
}

impl AccessToken {
    /// Non-secret prefix for diagnostics
    pub fn preview(&self) -> String {
        let prefix: String = self.token.chars().take(8).collect();
        format!("{}...", prefix)
    }
}

// ============================================================================
// Carrier Trait
// ============================================================================

/// Shipping carrier able to produce labels
#[async_trait]
pub trait LabelCarrier: Send + Sync {
    /// Carrier code (e.g., "ups")
    fn code(&self) -> &'static str;

    /// API base URL
    fn base_url(&self) -> &str;

    /// Current bearer token, exchanging credentials if the cached one is stale
    async fn access_token(&self) -> CarrierResult<AccessToken>;

    /// Create a shipment and return its label
    ///
    /// Called exactly once per label; failures are not retried.
    async fn create_shipment(&self, request: &ShipmentRequest) -> CarrierResult<ShipmentResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_preview_hides_secret() {
        let token = AccessToken {
            token: "eyJhbGciOiJSUzM4NCJ9.payload.signature".to_string(),
            ttl_seconds: 3600,
        };
        assert_eq!(token.preview(), "eyJhbGci...");
    }

    #[test]
    fn test_auth_error_mentions_status() {
        let err = CarrierError::AuthFailed { status: 401, body: "invalid_client".to_string() };
        assert!(err.to_string().contains("401"));
    }
}
