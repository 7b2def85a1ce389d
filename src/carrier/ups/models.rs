//! UPS Shipping API wire models
//!
//! Request structs serialize to the `ShipmentRequest` JSON document, response
//! structs cover only the parts of `ShipmentResponse` we read. They are
//! mapped to and from domain types in the mapper module.

use serde::{Deserialize, Serialize};

// ============================================================================
// Shared
// ============================================================================

/// `{ "Code": ..., "Description": ... }`, used all over the UPS schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsCode {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl UpsCode {
    pub fn new(code: impl Into<String>) -> Self {
        UpsCode { code: code.into(), description: None }
    }

    pub fn described(code: impl Into<String>, description: Option<String>) -> Self {
        UpsCode { code: code.into(), description }
    }
}

// ============================================================================
// Shipment Request
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsShipmentEnvelope {
    pub shipment_request: UpsShipmentRequest,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsShipmentRequest {
    pub request: UpsRequestInfo,
    pub shipment: UpsShipment,
    pub label_specification: UpsLabelSpecification,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsRequestInfo {
    pub request_option: String,
    pub transaction_reference: UpsTransactionReference,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsTransactionReference {
    pub customer_context: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsShipment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub shipper: UpsShipper,
    pub ship_to: UpsParty,
    pub ship_from: UpsParty,
    pub payment_information: UpsPaymentInformation,
    pub service: UpsCode,
    pub package: Vec<UpsPackage>,
    /// Present only on return shipments ("9" = print return label)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_service: Option<UpsCode>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsShipper {
    pub name: String,
    pub attention_name: String,
    pub shipper_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<UpsPhone>,
    pub address: UpsAddress,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsParty {
    pub name: String,
    pub attention_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<UpsPhone>,
    pub address: UpsAddress,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsPhone {
    pub number: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsAddress {
    pub address_line: Vec<String>,
    pub city: String,
    pub state_province_code: String,
    pub postal_code: String,
    pub country_code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsPaymentInformation {
    pub shipment_charge: Vec<UpsShipmentCharge>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsShipmentCharge {
    /// "01" = transportation charges
    #[serde(rename = "Type")]
    pub charge_type: String,
    pub bill_shipper: UpsBillShipper,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsBillShipper {
    pub account_number: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsPackage {
    pub description: String,
    pub packaging: UpsCode,
    pub dimensions: UpsDimensions,
    pub package_weight: UpsPackageWeight,
    pub package_service_options: UpsPackageServiceOptions,
    pub reference_number: Vec<UpsReferenceNumber>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsDimensions {
    pub unit_of_measurement: UpsCode,
    pub length: String,
    pub width: String,
    pub height: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsPackageWeight {
    pub unit_of_measurement: UpsCode,
    pub weight: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsPackageServiceOptions {
    pub declared_value: UpsDeclaredValue,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsDeclaredValue {
    pub currency_code: String,
    pub monetary_value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsReferenceNumber {
    pub value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsLabelSpecification {
    pub label_image_format: UpsCode,
    /// Required by UPS for GIF labels
    #[serde(rename = "HTTPUserAgent", skip_serializing_if = "Option::is_none")]
    pub http_user_agent: Option<String>,
}

// ============================================================================
// Shipment Response
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsShipmentResponseEnvelope {
    pub shipment_response: UpsShipmentResponse,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsShipmentResponse {
    #[serde(default)]
    pub shipment_results: Option<UpsShipmentResults>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsShipmentResults {
    #[serde(default)]
    pub shipment_identification_number: Option<String>,
    #[serde(default)]
    pub package_results: Option<OneOrMany<UpsPackageResult>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsPackageResult {
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub shipping_label: Option<UpsShippingLabel>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpsShippingLabel {
    #[serde(default)]
    pub image_format: Option<UpsCode>,
    #[serde(default)]
    pub graphic_image: Option<String>,
}

/// UPS returns a bare object for one package and an array for several
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    /// The first (for our single-package shipments, the only) element
    pub fn into_first(self) -> Option<T> {
        match self {
            OneOrMany::One(item) => Some(item),
            OneOrMany::Many(items) => items.into_iter().next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_serializes_pascal_case() {
        let value = serde_json::to_value(UpsCode::described("03", Some("Ground".to_string()))).unwrap();
        assert_eq!(value["Code"], "03");
        assert_eq!(value["Description"], "Ground");

        let bare = serde_json::to_value(UpsCode::new("9")).unwrap();
        assert!(bare.get("Description").is_none());
    }

    #[test]
    fn test_one_or_many() {
        let one: OneOrMany<u32> = serde_json::from_str("7").unwrap();
        let many: OneOrMany<u32> = serde_json::from_str("[7, 8]").unwrap();
        let empty: OneOrMany<u32> = serde_json::from_str("[]").unwrap();
        assert_eq!(one.into_first(), Some(7));
        assert_eq!(many.into_first(), Some(7));
        assert_eq!(empty.into_first(), None);
    }
}
