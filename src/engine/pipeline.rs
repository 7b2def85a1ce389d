//! Label service
//!
//! One call per label: build the shipment, let the carrier create it, stamp
//! the sender banner, package the result. Nothing is retried and nothing is
//! stored.

use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, info};

use crate::carrier::LabelCarrier;
use crate::config::{LabelSettings, Settings};
use crate::domain::{LabelFormat, LabelOrder, Mode, ShipmentRequest};
use super::builder::ShipmentBuilder;
use super::error::LabelError;
use super::overlay::{annotate, RenderError};
use super::packager::{package, FinishedLabel, LabelPayload};

/// Orchestrates label creation for the HTTP layer
pub struct LabelService {
    carrier: Arc<dyn LabelCarrier>,
    builder: ShipmentBuilder,
    labels: LabelSettings,
}

impl LabelService {
    pub fn new(carrier: Arc<dyn LabelCarrier>, settings: &Settings) -> Self {
        LabelService {
            carrier,
            builder: ShipmentBuilder::new(&settings.business),
            labels: settings.labels.clone(),
        }
    }

    pub fn carrier(&self) -> &dyn LabelCarrier {
        self.carrier.as_ref()
    }

    /// Create one label and package it for the caller
    pub async fn create_label(
        &self,
        order: &LabelOrder,
        json_requested: bool,
    ) -> Result<LabelPayload, LabelError> {
        let mode = Mode::parse(order.mode.as_deref());
        let request = self.builder.build(order, mode)?;

        let result = self.carrier.create_shipment(&request).await?;
        let bytes = self.post_process(&request, result.label, result.format).await?;

        info!(
            mode = mode.as_str(),
            tracking = ?result.tracking_number,
            format = result.format.code(),
            bytes = bytes.len(),
            "Label ready"
        );

        Ok(package(
            FinishedLabel {
                bytes,
                format: result.format,
                tracking_number: result.tracking_number,
                mode,
            },
            json_requested,
        ))
    }

    async fn post_process(
        &self,
        request: &ShipmentRequest,
        label: Bytes,
        format: LabelFormat,
    ) -> Result<Bytes, RenderError> {
        if !self.labels.sender_banner || format != LabelFormat::Pdf {
            return Ok(label);
        }

        let banner = format!("{} {}", self.labels.banner_prefix, request.sender_name())
            .trim()
            .to_uppercase();
        debug!(banner = %banner, "Stamping sender banner");

        // PDF parsing is CPU-bound; keep it off the async workers
        tokio::task::spawn_blocking(move || annotate(label, format, &banner))
            .await
            .map_err(|e| RenderError::Task(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carrier::CarrierError;
    use crate::test_support::{self, FakeCarrier};
    use lopdf::Document;

    fn service(carrier: Arc<FakeCarrier>, banner: bool) -> LabelService {
        let mut settings = test_support::settings("http://unused");
        settings.labels.sender_banner = banner;
        LabelService::new(carrier, &settings)
    }

    fn page_content(pdf: &[u8]) -> Vec<u8> {
        let doc = Document::load_mem(pdf).unwrap();
        let page = *doc.get_pages().values().next().unwrap();
        doc.get_page_content(page).unwrap()
    }

    #[tokio::test]
    async fn test_return_label_is_stamped_with_sender() {
        let carrier = Arc::new(FakeCarrier::pdf());
        let order = LabelOrder { mode: Some("return".to_string()), ..test_support::order() };

        let payload = service(carrier.clone(), true).create_label(&order, false).await.unwrap();
        match payload {
            LabelPayload::Binary { bytes, filename, .. } => {
                let content = page_content(&bytes);
                assert!(content.windows(14).any(|w| w == b"FROM: JANE DOE"));
                assert!(filename.starts_with("return-label"));
            }
            other => panic!("expected binary payload, got {:?}", other),
        }

        let sent = carrier.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].ship_from.name, "Jane Doe");
    }

    #[tokio::test]
    async fn test_banner_disabled_keeps_carrier_bytes() {
        let carrier = Arc::new(FakeCarrier::pdf());
        let payload = service(carrier, false)
            .create_label(&test_support::order(), true)
            .await
            .unwrap();
        match payload {
            LabelPayload::Json(envelope) => {
                use base64::Engine;
                let expected = base64::engine::general_purpose::STANDARD
                    .encode(test_support::pdf_label(1, None));
                assert_eq!(envelope.label_base64, expected);
            }
            other => panic!("expected json payload, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_recipient_never_reaches_carrier() {
        let carrier = Arc::new(FakeCarrier::pdf());
        let order = LabelOrder { to: None, ..test_support::order() };
        let err = service(carrier.clone(), true).create_label(&order, false).await.unwrap_err();

        assert!(matches!(err, LabelError::Validation(_)));
        assert!(carrier.requests().is_empty());
    }

    #[tokio::test]
    async fn test_carrier_failure_is_not_retried() {
        let carrier = Arc::new(FakeCarrier::failing(503, "unavailable"));
        let err = service(carrier.clone(), true)
            .create_label(&test_support::order(), false)
            .await
            .unwrap_err();

        assert!(matches!(err, LabelError::Carrier(CarrierError::Api { status: 503, .. })));
        assert_eq!(carrier.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_a_render_error() {
        let carrier = Arc::new(FakeCarrier::with_label(Bytes::from_static(b"%PDF-garbage"), LabelFormat::Pdf));
        let err = service(carrier, true)
            .create_label(&test_support::order(), false)
            .await
            .unwrap_err();
        assert!(matches!(err, LabelError::Render(_)));
    }
}
