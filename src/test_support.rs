//! Shared fixtures for unit tests

use async_trait::async_trait;
use base64::Engine;
use bytes::Bytes;
use httpmock::prelude::*;
use httpmock::Mock;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use serde_json::{json, Value};
use std::sync::Mutex;

use crate::carrier::{AccessToken, CarrierError, CarrierResult, LabelCarrier};
use crate::config::Settings;
use crate::domain::{AddressInput, LabelFormat, LabelOrder, Mode, ShipmentRequest, ShipmentResult};
use crate::engine::builder::ShipmentBuilder;

pub const SHIPPER_NUMBER: &str = "1Y703V";
pub const TOKEN_PATH: &str = "/security/v1/oauth/token";
pub const SHIP_PATH: &str = "/api/shipments/v1/ship";

/// Settings pointing the carrier at `base_url`
pub fn settings(base_url: &str) -> Settings {
    let mut settings = Settings::default();
    settings.carrier.base_url = Some(base_url.to_string());
    settings.carrier.client_id = "test-client".to_string();
    settings.carrier.client_secret = "test-secret".to_string();
    settings.carrier.timeout_secs = 5;
    settings.carrier.auth_timeout_secs = 5;
    settings.business.shipper_number = SHIPPER_NUMBER.to_string();
    settings
}

/// The Jane Doe order used across tests
pub fn order() -> LabelOrder {
    LabelOrder {
        to: Some(AddressInput {
            name: Some("Jane Doe".to_string()),
            addr1: Some("1 Main St".to_string()),
            city: Some("Phoenix".to_string()),
            state: Some("AZ".to_string()),
            zip: Some("85001".to_string()),
            country: Some("US".to_string()),
            phone: None,
        }),
        ..Default::default()
    }
}

pub fn order_json() -> Value {
    json!({
        "to": {
            "name": "Jane Doe",
            "addr1": "1 Main St",
            "city": "Phoenix",
            "state": "AZ",
            "zip": "85001",
            "country": "US"
        },
        "mode": "return"
    })
}

pub fn shipment_request(mode: Mode) -> ShipmentRequest {
    ShipmentBuilder::new(&settings("http://unused").business)
        .build(&order(), mode)
        .expect("fixture order is valid")
}

/// A small label PDF; MediaBox, Resources and Rotate sit on the page tree
/// root so they have to be inherited
pub fn pdf_label(pages: u32, rotation: Option<i64>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let mut kids = Vec::new();
    for n in 1..=pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), Object::Integer(14)]),
                Operation::new("Td", vec![Object::Integer(20), Object::Integer(200)]),
                Operation::new("Tj", vec![Object::string_literal(format!("PAGE {}", n))]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let mut root = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => pages as i64,
        "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(288),
            Object::Integer(432),
        ],
    };
    if let Some(rotation) = rotation {
        root.set("Rotate", rotation);
    }
    doc.objects.insert(pages_id, Object::Dictionary(root));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

pub fn encoded_pdf_label() -> String {
    base64::engine::general_purpose::STANDARD.encode(pdf_label(1, None))
}

/// Wrap one package result in a UPS shipment response
pub fn shipment_response(package: Value) -> Value {
    json!({
        "ShipmentResponse": {
            "Response": { "ResponseStatus": { "Code": "1", "Description": "Success" } },
            "ShipmentResults": {
                "ShipmentIdentificationNumber": "1Z999AA10123456784",
                "PackageResults": package
            }
        }
    })
}

pub async fn mock_token(server: &MockServer) -> Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(POST).path(TOKEN_PATH);
            then.status(200)
                .json_body(json!({ "access_token": "tok-e2e", "token_type": "Bearer", "expires_in": "14399" }));
        })
        .await
}

pub async fn mock_ship(server: &MockServer) -> Mock<'_> {
    let body = shipment_response(json!({
        "TrackingNumber": "1Z999AA10123456784",
        "ShippingLabel": {
            "ImageFormat": { "Code": "PDF" },
            "GraphicImage": encoded_pdf_label()
        }
    }));
    server
        .mock_async(move |when, then| {
            when.method(POST).path(SHIP_PATH).header("Authorization", "Bearer tok-e2e");
            then.status(200).json_body(body);
        })
        .await
}

/// In-memory carrier that records what it was asked to ship
pub struct FakeCarrier {
    label: Bytes,
    format: LabelFormat,
    failure: Option<(u16, String)>,
    requests: Mutex<Vec<ShipmentRequest>>,
}

impl FakeCarrier {
    pub fn pdf() -> Self {
        Self::with_label(Bytes::from(pdf_label(1, None)), LabelFormat::Pdf)
    }

    pub fn with_label(label: Bytes, format: LabelFormat) -> Self {
        FakeCarrier {
            label,
            format,
            failure: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16, body: &str) -> Self {
        FakeCarrier {
            failure: Some((status, body.to_string())),
            ..Self::pdf()
        }
    }

    pub fn requests(&self) -> Vec<ShipmentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LabelCarrier for FakeCarrier {
    fn code(&self) -> &'static str {
        "fake"
    }

    fn base_url(&self) -> &str {
        "memory://fake"
    }

    async fn access_token(&self) -> CarrierResult<AccessToken> {
        Ok(AccessToken {
            token: "fake-token-value".to_string(),
            ttl_seconds: 3600,
        })
    }

    async fn create_shipment(&self, request: &ShipmentRequest) -> CarrierResult<ShipmentResult> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some((status, body)) = &self.failure {
            return Err(CarrierError::Api {
                status: *status,
                body: body.clone(),
            });
        }
        Ok(ShipmentResult {
            tracking_number: Some("1ZFAKE0001".to_string()),
            label: self.label.clone(),
            format: self.format,
        })
    }
}

/// Application state backed by a real UPS client pointed at `base_url`
pub fn app_state(base_url: &str) -> actix_web::web::Data<crate::AppState> {
    let settings = settings(base_url);
    let carrier = crate::carrier::UpsCarrier::new(&settings.carrier).expect("client builds");
    actix_web::web::Data::new(crate::AppState {
        labels: crate::engine::LabelService::new(std::sync::Arc::new(carrier), &settings),
        settings,
    })
}
