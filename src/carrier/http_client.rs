//! Shared HTTP client for carrier APIs
//!
//! One `reqwest::Client` per process so connections to the carrier are pooled
//! across label requests. Timeouts are set per request by the callers.

use reqwest::Client;
use std::time::Duration;

use crate::carrier::traits::{CarrierError, CarrierResult};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Upper bound on error bodies kept for reporting; UPS error documents are
/// a few hundred bytes, so real rejections pass through whole
pub const MAX_ERROR_BODY_CHARS: usize = 64 * 1024;

/// Build the carrier HTTP client
pub fn build_client() -> CarrierResult<Client> {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .pool_max_idle_per_host(10)
        .user_agent(concat!("prl-label-service/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(CarrierError::from)
}

/// Read a response body for an error report, bounded in size
pub async fn error_body(response: reqwest::Response) -> String {
    let text = response.text().await.unwrap_or_default();
    truncate(&text, MAX_ERROR_BODY_CHARS)
}

pub(crate) fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(build_client().is_ok());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }
}
