//! Carrier-agnostic shipment records

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::party::Party;

/// Shipment direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Business ships to the caller
    Outbound,
    /// Caller ships back to the business (print return label)
    Return,
}

impl Mode {
    /// Parse a caller value; anything unrecognized is outbound
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("return") => Mode::Return,
            _ => Mode::Outbound,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Outbound => "outbound",
            Mode::Return => "return",
        }
    }

    pub fn is_return(&self) -> bool {
        matches!(self, Mode::Return)
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Outbound
    }
}

/// Label image format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum LabelFormat {
    Pdf,
    Gif,
}

impl LabelFormat {
    /// Parse a caller or carrier value; anything but GIF is PDF
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_uppercase()).as_deref() {
            Some("GIF") => LabelFormat::Gif,
            _ => LabelFormat::Pdf,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            LabelFormat::Pdf => "PDF",
            LabelFormat::Gif => "GIF",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            LabelFormat::Pdf => "application/pdf",
            LabelFormat::Gif => "image/gif",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            LabelFormat::Pdf => "pdf",
            LabelFormat::Gif => "gif",
        }
    }
}

impl Default for LabelFormat {
    fn default() -> Self {
        LabelFormat::Pdf
    }
}

/// Carrier service level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub code: String,
    pub description: Option<String>,
}

/// Package measurements in the configured unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimensions {
    pub unit: String,
    pub length: String,
    pub width: String,
    pub height: String,
}

/// Monetary value declared to the carrier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredValue {
    pub currency: String,
    pub amount: String,
}

/// The single package of a shipment
#[derive(Debug, Clone, PartialEq)]
pub struct PackageSpec {
    pub packaging_code: String,
    pub description: String,
    pub weight: f64,
    pub weight_unit: String,
    pub dimensions: Dimensions,
    pub declared_value: DeclaredValue,
    /// Already sanitized; the first tag is always present
    pub references: Vec<String>,
}

/// Billed business account and its address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shipper {
    pub account_number: String,
    pub party: Party,
}

/// A shipment ready to be sent to a carrier
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentRequest {
    pub mode: Mode,
    pub customer_context: String,
    pub shipper: Shipper,
    pub ship_from: Party,
    pub ship_to: Party,
    pub service: Service,
    pub package: PackageSpec,
    pub label_format: LabelFormat,
}

impl ShipmentRequest {
    /// Name of the party physically sending the package
    pub fn sender_name(&self) -> &str {
        &self.ship_from.name
    }
}

/// What the carrier handed back for one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipmentResult {
    pub tracking_number: Option<String>,
    pub label: Bytes,
    pub format: LabelFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!(Mode::parse(Some("return")), Mode::Return);
        assert_eq!(Mode::parse(Some(" RETURN ")), Mode::Return);
        assert_eq!(Mode::parse(Some("outbound")), Mode::Outbound);
        assert_eq!(Mode::parse(Some("sideways")), Mode::Outbound);
        assert_eq!(Mode::parse(None), Mode::Outbound);
    }

    #[test]
    fn test_label_format_parse() {
        assert_eq!(LabelFormat::parse(Some("gif")), LabelFormat::Gif);
        assert_eq!(LabelFormat::parse(Some("PDF")), LabelFormat::Pdf);
        assert_eq!(LabelFormat::parse(Some("ZPL")), LabelFormat::Pdf);
        assert_eq!(LabelFormat::parse(None), LabelFormat::Pdf);
    }

    #[test]
    fn test_label_format_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&LabelFormat::Pdf).unwrap(), "\"PDF\"");
        assert_eq!(LabelFormat::Gif.content_type(), "image/gif");
    }
}
