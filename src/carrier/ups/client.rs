//! UPS API Client Implementation
//!
//! Implements [`LabelCarrier`] for the UPS REST Shipping API: OAuth client
//! credentials for the bearer token, then one `POST` to the ship endpoint.
//!
//! API Docs: https://developer.ups.com/api/reference

use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client};
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::carrier::http_client::{build_client, error_body, truncate};
use crate::carrier::traits::{AccessToken, CarrierError, CarrierResult, LabelCarrier};
use crate::config::CarrierSettings;
use crate::domain::{ShipmentRequest, ShipmentResult};
use super::auth::CredentialManager;
use super::mapper::UpsMapper;
use super::models::UpsShipmentResponseEnvelope;

/// UPS carrier client
pub struct UpsCarrier {
    http: Client,
    credentials: CredentialManager,
    base_url: String,
    ship_url: String,
    transaction_src: String,
    timeout: Duration,
}

impl UpsCarrier {
    /// Create a UPS client from carrier settings
    pub fn new(settings: &CarrierSettings) -> CarrierResult<Self> {
        let http = build_client()?;
        let base_url = settings.base_url();

        let credentials = CredentialManager::new(
            http.clone(),
            format!("{}{}", base_url, settings.token_path),
            settings.client_id.clone(),
            settings.client_secret.clone(),
            Duration::from_secs(settings.auth_timeout_secs),
        );

        Ok(UpsCarrier {
            http,
            credentials,
            ship_url: format!("{}{}", base_url, settings.ship_path),
            base_url,
            transaction_src: settings.transaction_src.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
        })
    }

    /// Send one shipment request with an already obtained bearer token
    pub async fn submit(&self, request: &ShipmentRequest, token: &str) -> CarrierResult<ShipmentResult> {
        let envelope = UpsMapper::shipment_envelope(request);
        // UPS caps transId at 32 characters
        let trans_id = Uuid::new_v4().simple().to_string();

        debug!(
            url = %self.ship_url,
            trans_id = %trans_id,
            mode = request.mode.as_str(),
            service = %request.service.code,
            "UPS shipment request"
        );

        let response = self
            .http
            .post(&self.ship_url)
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .header("transId", trans_id.as_str())
            .header("transactionSrc", self.transaction_src.as_str())
            .timeout(self.timeout)
            .json(&envelope)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            warn!(status = status.as_u16(), trans_id = %trans_id, "UPS rejected shipment");
            return Err(CarrierError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let parsed: UpsShipmentResponseEnvelope = serde_json::from_str(&text).map_err(|e| {
            CarrierError::MalformedResponse(format!("{} - Body: {}", e, truncate(&text, 500)))
        })?;

        let result = UpsMapper::extract_result(parsed, request.label_format)?;

        info!(
            trans_id = %trans_id,
            tracking = ?result.tracking_number,
            format = result.format.code(),
            "UPS shipment created"
        );

        Ok(result)
    }
}

#[async_trait]
impl LabelCarrier for UpsCarrier {
    fn code(&self) -> &'static str {
        "ups"
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn access_token(&self) -> CarrierResult<AccessToken> {
        self.credentials.get_token().await
    }

    async fn create_shipment(&self, request: &ShipmentRequest) -> CarrierResult<ShipmentResult> {
        let token = self.credentials.get_token().await?;
        self.submit(request, &token.token).await
    }
}
