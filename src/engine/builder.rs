//! Shipment request builder
//!
//! Merges a caller's [`LabelOrder`] with the business constants from
//! configuration. The business is always the shipper and the billed account;
//! the direction only decides who is ship-from and who is ship-to.

use thiserror::Error;
use tracing::debug;

use crate::config::{AddressSettings, BusinessSettings, PackageSettings};
use crate::domain::reference::{primary_reference, sanitize_reference};
use crate::domain::{
    AddressInput, DeclaredValue, Dimensions, LabelFormat, LabelOrder, Mode, PackageSpec, Party,
    Service, ShipmentRequest, Shipper,
};

const DEFAULT_WEIGHT_LBS: f64 = 1.0;

/// Request building errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Missing 'to' address")]
    MissingRecipient,
    #[error("Missing '{0}' in 'to' address")]
    MissingField(&'static str),
    #[error("Shipper account number is not configured")]
    MissingAccount,
}

/// Builds carrier-agnostic shipment requests
#[derive(Debug, Clone)]
pub struct ShipmentBuilder {
    account_number: String,
    business: Party,
    default_service: Service,
    package: PackageSettings,
    promo_code: Option<String>,
}

impl ShipmentBuilder {
    pub fn new(settings: &BusinessSettings) -> Self {
        ShipmentBuilder {
            account_number: settings.shipper_number.trim().to_string(),
            business: business_party(&settings.address),
            default_service: Service {
                code: settings.service_code.clone(),
                description: Some(settings.service_description.clone())
                    .filter(|d| !d.is_empty()),
            },
            package: settings.package.clone(),
            promo_code: settings.promo_code.clone(),
        }
    }

    /// The business's own party
    pub fn business(&self) -> &Party {
        &self.business
    }

    /// Build the shipment for one order
    pub fn build(&self, order: &LabelOrder, mode: Mode) -> Result<ShipmentRequest, BuildError> {
        let recipient = order.to.as_ref().ok_or(BuildError::MissingRecipient)?;
        let caller = caller_party(recipient)?;

        if self.account_number.is_empty() {
            return Err(BuildError::MissingAccount);
        }

        let (ship_from, ship_to) = match mode {
            Mode::Outbound => (self.business.clone(), caller),
            Mode::Return => (caller, self.business.clone()),
        };

        let service = order
            .service_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(|code| Service {
                code: code.to_string(),
                description: None,
            })
            .unwrap_or_else(|| self.default_service.clone());

        let mut references = vec![primary_reference(order.reference.as_deref(), &ship_from.name)];
        if let Some(promo) = self
            .promo_code
            .as_deref()
            .map(sanitize_reference)
            .filter(|p| !p.is_empty())
        {
            references.push(promo);
        }

        let package = PackageSpec {
            packaging_code: self.package.packaging_code.clone(),
            description: self.package.description.clone(),
            weight: weight_lbs(order.weight_lbs),
            weight_unit: self.package.weight_unit.clone(),
            dimensions: Dimensions {
                unit: self.package.dimension_unit.clone(),
                length: self.package.length.clone(),
                width: self.package.width.clone(),
                height: self.package.height.clone(),
            },
            declared_value: DeclaredValue {
                currency: self.package.currency.clone(),
                amount: self.package.declared_value.clone(),
            },
            references,
        };

        debug!(
            mode = mode.as_str(),
            service = %service.code,
            weight = package.weight,
            "Built shipment request"
        );

        Ok(ShipmentRequest {
            mode,
            customer_context: match mode {
                Mode::Return => "PRL".to_string(),
                Mode::Outbound => "OUTBOUND".to_string(),
            },
            shipper: Shipper {
                account_number: self.account_number.clone(),
                party: self.business.clone(),
            },
            ship_from,
            ship_to,
            service,
            package,
            label_format: LabelFormat::parse(order.format.as_deref()),
        })
    }
}

fn business_party(address: &AddressSettings) -> Party {
    Party {
        name: address.name.clone(),
        attention: address.attention.clone(),
        phone: address.phone.clone(),
        address_line: address.address_line.clone(),
        city: address.city.clone(),
        state: address.state.clone(),
        postal_code: address.postal_code.clone(),
        country: address.country.clone(),
    }
}

fn caller_party(input: &AddressInput) -> Result<Party, BuildError> {
    Ok(Party {
        name: required(&input.name, "name")?,
        attention: None,
        phone: input
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string),
        address_line: required(&input.addr1, "addr1")?,
        city: required(&input.city, "city")?,
        state: required(&input.state, "state")?,
        postal_code: required(&input.zip, "zip")?,
        country: required(&input.country, "country")?,
    })
}

fn required(value: &Option<String>, field: &'static str) -> Result<String, BuildError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(BuildError::MissingField(field))
}

/// Caller weight rounded to 2 decimals; range is not checked
fn weight_lbs(value: Option<f64>) -> f64 {
    value
        .filter(|w| w.is_finite())
        .map(|w| (w * 100.0).round() / 100.0)
        .unwrap_or(DEFAULT_WEIGHT_LBS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reference::REFERENCE_MAX_LEN;
    use crate::test_support;

    fn builder() -> ShipmentBuilder {
        ShipmentBuilder::new(&test_support::settings("http://unused").business)
    }

    #[test]
    fn test_mode_flip_swaps_parties() {
        let orders = [
            test_support::order(),
            LabelOrder {
                weight_lbs: Some(3.456),
                reference: Some("Case #7781".to_string()),
                format: Some("GIF".to_string()),
                ..test_support::order()
            },
            LabelOrder {
                service_code: Some("02".to_string()),
                ..test_support::order()
            },
        ];

        for order in orders {
            let outbound = builder().build(&order, Mode::Outbound).unwrap();
            let inbound = builder().build(&order, Mode::Return).unwrap();

            assert_eq!(outbound.ship_from, inbound.ship_to);
            assert_eq!(outbound.ship_to, inbound.ship_from);
            assert_eq!(outbound.shipper, inbound.shipper);
            assert_eq!(outbound.service, inbound.service);
            assert_eq!(outbound.label_format, inbound.label_format);
            assert_eq!(outbound.package.weight, inbound.package.weight);
        }
    }

    #[test]
    fn test_shipper_is_always_business() {
        let order = test_support::order();
        for mode in [Mode::Outbound, Mode::Return] {
            let request = builder().build(&order, mode).unwrap();
            assert_eq!(request.shipper.account_number, test_support::SHIPPER_NUMBER);
            assert_eq!(&request.shipper.party, builder().business());
        }
    }

    #[test]
    fn test_missing_recipient() {
        let order = LabelOrder { to: None, ..test_support::order() };
        assert_eq!(builder().build(&order, Mode::Return), Err(BuildError::MissingRecipient));
        assert_eq!(BuildError::MissingRecipient.to_string(), "Missing 'to' address");
    }

    #[test]
    fn test_blank_recipient_field() {
        let mut order = test_support::order();
        if let Some(to) = order.to.as_mut() {
            to.city = Some("   ".to_string());
        }
        assert_eq!(builder().build(&order, Mode::Outbound), Err(BuildError::MissingField("city")));
    }

    #[test]
    fn test_missing_account() {
        let mut settings = test_support::settings("http://unused").business;
        settings.shipper_number = String::new();
        let err = ShipmentBuilder::new(&settings)
            .build(&test_support::order(), Mode::Outbound)
            .unwrap_err();
        assert_eq!(err, BuildError::MissingAccount);
    }

    #[test]
    fn test_defaults() {
        let request = builder().build(&test_support::order(), Mode::Outbound).unwrap();
        assert_eq!(request.package.weight, 1.0);
        assert_eq!(request.service.code, "03");
        assert_eq!(request.label_format, LabelFormat::Pdf);
        assert_eq!(request.package.dimensions.length, "10");
        assert_eq!(request.package.declared_value.amount, "100.00");
        assert_eq!(request.customer_context, "OUTBOUND");
    }

    #[test]
    fn test_caller_overrides() {
        let order = LabelOrder {
            weight_lbs: Some(2.346),
            service_code: Some(" 01 ".to_string()),
            format: Some("gif".to_string()),
            ..test_support::order()
        };
        let request = builder().build(&order, Mode::Return).unwrap();
        assert_eq!(request.package.weight, 2.35);
        assert_eq!(request.service.code, "01");
        assert_eq!(request.label_format, LabelFormat::Gif);
        assert_eq!(request.customer_context, "PRL");
    }

    #[test]
    fn test_weight_is_not_range_checked() {
        let order = LabelOrder { weight_lbs: Some(0.2), ..test_support::order() };
        let request = builder().build(&order, Mode::Outbound).unwrap();
        assert_eq!(request.package.weight, 0.2);
    }

    #[test]
    fn test_reference_from_sender_name() {
        let request = builder().build(&test_support::order(), Mode::Return).unwrap();
        assert_eq!(request.package.references[0], "Jane Doe");

        let outbound = builder().build(&test_support::order(), Mode::Outbound).unwrap();
        assert_eq!(outbound.package.references[0], "First Impressions Dental Lab");
    }

    #[test]
    fn test_reference_and_promo_are_sanitized() {
        let mut settings = test_support::settings("http://unused").business;
        settings.promo_code = Some("PROMO: SPRING-24".to_string());
        let order = LabelOrder {
            reference: Some(format!("Case: {}", "9".repeat(60))),
            ..test_support::order()
        };

        let request = ShipmentBuilder::new(&settings).build(&order, Mode::Return).unwrap();
        let refs = &request.package.references;
        assert_eq!(refs.len(), 2);
        assert!(refs[0].starts_with("Case 999"));
        assert_eq!(refs[0].len(), REFERENCE_MAX_LEN);
        assert_eq!(refs[1], "PROMO SPRING-24");
    }
}
