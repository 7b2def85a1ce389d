//! Error to HTTP translation
//!
//! Every failure leaves the service as `{ "ok": false, "error": ... }`.
//! Carrier rejections keep the carrier's own status code and also echo it in
//! the body.

use actix_web::{error::InternalError, http::StatusCode, web, HttpResponse, ResponseError};
use serde::Serialize;
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::carrier::CarrierError;
use crate::engine::LabelError;

const MAX_BODY_BYTES: usize = 64 * 1024;

/// Error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub ok: bool,
    /// Carrier status code, for carrier rejections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        ErrorResponse {
            ok: false,
            status: None,
            error: error.into(),
        }
    }
}

impl ResponseError for LabelError {
    fn status_code(&self) -> StatusCode {
        match self {
            LabelError::Validation(_) => StatusCode::BAD_REQUEST,
            LabelError::Carrier(CarrierError::Api { status, .. }) => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.as_u16() >= 300)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Label request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Label request rejected");
        }

        let body = match self {
            LabelError::Carrier(CarrierError::Api { status, body }) => ErrorResponse {
                ok: false,
                status: Some(*status),
                error: body.clone(),
            },
            other => ErrorResponse::new(other.to_string()),
        };

        HttpResponse::build(status).json(body)
    }
}

/// JSON extractor settings: any content type, errors in the usual envelope
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_BODY_BYTES)
        .content_type_required(false)
        .error_handler(|err, _req| {
            warn!(error = %err, "Rejected request body");
            let response = HttpResponse::BadRequest().json(ErrorResponse::new(format!("Invalid JSON body: {}", err)));
            InternalError::from_response(err, response).into()
        })
}
