//! Domain to UPS wire mapping
//!
//! The only place that knows how a [`ShipmentRequest`] looks as UPS JSON and
//! how a UPS shipment response turns back into a [`ShipmentResult`].

use base64::Engine;
use bytes::Bytes;
use tracing::debug;

use crate::carrier::traits::{CarrierError, CarrierResult};
use crate::domain::{LabelFormat, Party, ShipmentRequest, ShipmentResult};
use super::models::*;

/// PRL (print return label) return service code
const RETURN_SERVICE_PRL: &str = "9";
/// Transportation charges billed to the shipper
const CHARGE_TYPE_TRANSPORTATION: &str = "01";
const GIF_USER_AGENT: &str = "Mozilla/4.5";

/// Mapper between domain shipments and the UPS Shipping API
pub struct UpsMapper;

impl UpsMapper {
    /// Build the `ShipmentRequest` document for a shipment
    pub fn shipment_envelope(request: &ShipmentRequest) -> UpsShipmentEnvelope {
        let shipper = &request.shipper;
        let package = &request.package;

        let return_service = request
            .mode
            .is_return()
            .then(|| UpsCode::new(RETURN_SERVICE_PRL));

        UpsShipmentEnvelope {
            shipment_request: UpsShipmentRequest {
                request: UpsRequestInfo {
                    request_option: "nonvalidate".to_string(),
                    transaction_reference: UpsTransactionReference {
                        customer_context: request.customer_context.clone(),
                    },
                },
                shipment: UpsShipment {
                    description: request.mode.is_return().then(|| package.description.clone()),
                    shipper: UpsShipper {
                        name: shipper.party.name.clone(),
                        attention_name: shipper.party.attention_name().to_string(),
                        shipper_number: shipper.account_number.clone(),
                        phone: Self::phone(&shipper.party),
                        address: Self::address(&shipper.party),
                    },
                    ship_to: Self::party(&request.ship_to),
                    ship_from: Self::party(&request.ship_from),
                    payment_information: UpsPaymentInformation {
                        shipment_charge: vec![UpsShipmentCharge {
                            charge_type: CHARGE_TYPE_TRANSPORTATION.to_string(),
                            bill_shipper: UpsBillShipper {
                                account_number: shipper.account_number.clone(),
                            },
                        }],
                    },
                    service: UpsCode::described(
                        request.service.code.clone(),
                        request.service.description.clone(),
                    ),
                    package: vec![UpsPackage {
                        description: package.description.clone(),
                        packaging: UpsCode::new(package.packaging_code.clone()),
                        dimensions: UpsDimensions {
                            unit_of_measurement: UpsCode::new(package.dimensions.unit.clone()),
                            length: package.dimensions.length.clone(),
                            width: package.dimensions.width.clone(),
                            height: package.dimensions.height.clone(),
                        },
                        package_weight: UpsPackageWeight {
                            unit_of_measurement: UpsCode::new(package.weight_unit.clone()),
                            weight: format!("{:.2}", package.weight),
                        },
                        package_service_options: UpsPackageServiceOptions {
                            declared_value: UpsDeclaredValue {
                                currency_code: package.declared_value.currency.clone(),
                                monetary_value: package.declared_value.amount.clone(),
                            },
                        },
                        reference_number: package
                            .references
                            .iter()
                            .map(|value| UpsReferenceNumber { value: value.clone() })
                            .collect(),
                    }],
                    return_service,
                },
                label_specification: UpsLabelSpecification {
                    label_image_format: UpsCode::new(request.label_format.code()),
                    http_user_agent: (request.label_format == LabelFormat::Gif)
                        .then(|| GIF_USER_AGENT.to_string()),
                },
            },
        }
    }

    fn party(party: &Party) -> UpsParty {
        UpsParty {
            name: party.name.clone(),
            attention_name: party.attention_name().to_string(),
            phone: Self::phone(party),
            address: Self::address(party),
        }
    }

    fn phone(party: &Party) -> Option<UpsPhone> {
        party.phone.as_ref().map(|number| UpsPhone { number: number.clone() })
    }

    fn address(party: &Party) -> UpsAddress {
        UpsAddress {
            address_line: vec![party.address_line.clone()],
            city: party.city.clone(),
            state_province_code: party.state.clone(),
            postal_code: party.postal_code.clone(),
            country_code: party.country.clone(),
        }
    }

    /// Reduce a shipment response to the single package we asked for
    pub fn extract_result(
        response: UpsShipmentResponseEnvelope,
        requested: LabelFormat,
    ) -> CarrierResult<ShipmentResult> {
        let results = response
            .shipment_response
            .shipment_results
            .ok_or_else(|| CarrierError::MalformedResponse("no ShipmentResults".to_string()))?;

        let package = results
            .package_results
            .and_then(OneOrMany::into_first)
            .ok_or_else(|| CarrierError::MalformedResponse("no PackageResults".to_string()))?;

        let label = package
            .shipping_label
            .ok_or_else(|| CarrierError::MalformedResponse("Label not found in response".to_string()))?;

        let encoded = label
            .graphic_image
            .filter(|image| !image.trim().is_empty())
            .ok_or_else(|| CarrierError::MalformedResponse("Label not found in response".to_string()))?;

        let bytes = Self::decode_label(&encoded)?;
        let format = Self::label_format(&bytes, label.image_format.as_ref(), requested);

        let tracking_number = package
            .tracking_number
            .or(results.shipment_identification_number)
            .filter(|t| !t.is_empty());

        debug!(
            tracking = ?tracking_number,
            format = format.code(),
            bytes = bytes.len(),
            "Extracted label from UPS response"
        );

        Ok(ShipmentResult {
            tracking_number,
            label: bytes,
            format,
        })
    }

    /// Decode the base64 `GraphicImage`, ignoring line breaks
    pub fn decode_label(encoded: &str) -> CarrierResult<Bytes> {
        let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        base64::engine::general_purpose::STANDARD
            .decode(compact.as_bytes())
            .map(Bytes::from)
            .map_err(|e| CarrierError::MalformedResponse(format!("label is not valid base64: {}", e)))
    }

    /// Declared format wins; otherwise sniff the bytes; otherwise what we asked for
    fn label_format(bytes: &[u8], declared: Option<&UpsCode>, requested: LabelFormat) -> LabelFormat {
        if let Some(code) = declared {
            return LabelFormat::parse(Some(code.code.as_str()));
        }
        if bytes.starts_with(b"%PDF") {
            return LabelFormat::Pdf;
        }
        match image::guess_format(bytes) {
            Ok(image::ImageFormat::Gif) => LabelFormat::Gif,
            _ => requested,
        }
    }
}
