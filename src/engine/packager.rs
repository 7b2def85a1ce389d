//! Response packaging for finished labels

use base64::Engine;
use bytes::Bytes;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{LabelFormat, Mode};

/// A label after post-processing
#[derive(Debug, Clone)]
pub struct FinishedLabel {
    pub bytes: Bytes,
    pub format: LabelFormat,
    pub tracking_number: Option<String>,
    pub mode: Mode,
}

/// JSON form of a label
#[derive(Debug, Serialize, ToSchema)]
pub struct LabelEnvelope {
    pub ok: bool,
    pub tracking: Option<String>,
    pub label_base64: String,
    pub format: LabelFormat,
}

/// What the caller receives
#[derive(Debug)]
pub enum LabelPayload {
    /// Document download
    Binary {
        bytes: Bytes,
        content_type: &'static str,
        filename: String,
    },
    Json(LabelEnvelope),
}

/// Package a finished label as a download or as JSON
pub fn package(label: FinishedLabel, json_requested: bool) -> LabelPayload {
    if json_requested {
        return LabelPayload::Json(LabelEnvelope {
            ok: true,
            label_base64: base64::engine::general_purpose::STANDARD.encode(&label.bytes),
            tracking: label.tracking_number,
            format: label.format,
        });
    }

    LabelPayload::Binary {
        filename: filename(label.mode, label.tracking_number.as_deref(), label.format),
        content_type: label.format.content_type(),
        bytes: label.bytes,
    }
}

/// `<mode>-label[-<tracking>].<ext>`
fn filename(mode: Mode, tracking: Option<&str>, format: LabelFormat) -> String {
    let suffix = tracking
        .map(|t| t.chars().filter(|c| c.is_ascii_alphanumeric()).collect::<String>())
        .filter(|t| !t.is_empty())
        .map(|t| format!("-{}", t))
        .unwrap_or_default();
    format!("{}-label{}.{}", mode.as_str(), suffix, format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(tracking: Option<&str>) -> FinishedLabel {
        FinishedLabel {
            bytes: Bytes::from_static(b"%PDF-1.5 test"),
            format: LabelFormat::Pdf,
            tracking_number: tracking.map(str::to_string),
            mode: Mode::Return,
        }
    }

    #[test]
    fn test_binary_payload() {
        match package(label(Some("1Z999AA1")), false) {
            LabelPayload::Binary { bytes, content_type, filename } => {
                assert_eq!(&bytes[..], b"%PDF-1.5 test");
                assert_eq!(content_type, "application/pdf");
                assert_eq!(filename, "return-label-1Z999AA1.pdf");
            }
            other => panic!("expected binary payload, got {:?}", other),
        }
    }

    #[test]
    fn test_filename_without_tracking() {
        assert_eq!(filename(Mode::Outbound, None, LabelFormat::Gif), "outbound-label.gif");
        assert_eq!(filename(Mode::Return, Some("../.."), LabelFormat::Pdf), "return-label.pdf");
    }

    #[test]
    fn test_json_payload() {
        match package(label(None), true) {
            LabelPayload::Json(envelope) => {
                let value = serde_json::to_value(&envelope).unwrap();
                assert_eq!(value["ok"], true);
                assert!(value["tracking"].is_null());
                assert_eq!(value["format"], "PDF");
                assert_eq!(value["label_base64"], "JVBERi0xLjUgdGVzdA==");
            }
            other => panic!("expected json payload, got {:?}", other),
        }
    }
}
