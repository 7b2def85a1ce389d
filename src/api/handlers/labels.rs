//! Label creation endpoint

use actix_web::{
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    web, HttpResponse,
};
use serde::Deserialize;
use std::time::Instant;
use tracing::info;
use utoipa::IntoParams;

use crate::domain::LabelOrder;
use crate::engine::{LabelError, LabelPayload};
use crate::AppState;

/// Query options for label creation
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CreateLabelQuery {
    /// `1` or `true` returns a JSON envelope instead of the document
    pub json: Option<String>,
}

impl CreateLabelQuery {
    pub fn wants_json(&self) -> bool {
        matches!(
            self.json.as_deref().map(str::trim).map(str::to_ascii_lowercase).as_deref(),
            Some("1" | "true" | "yes")
        )
    }
}

/// POST /labels/create - Create a shipping or return label
#[utoipa::path(
    post,
    path = "/labels/create",
    tag = "labels",
    params(CreateLabelQuery),
    request_body = LabelOrder,
    responses(
        (status = 200, description = "Label document download, or the JSON envelope with ?json=1", body = crate::engine::LabelEnvelope),
        (status = 400, description = "Missing or invalid recipient", body = crate::api::error::ErrorResponse),
        (status = 500, description = "Configuration, credential, carrier or rendering failure", body = crate::api::error::ErrorResponse)
    )
)]
pub async fn create_label(
    state: web::Data<AppState>,
    query: web::Query<CreateLabelQuery>,
    body: web::Json<LabelOrder>,
) -> Result<HttpResponse, LabelError> {
    let start = Instant::now();
    let json_requested = query.wants_json();

    info!(
        mode = body.mode.as_deref().unwrap_or("outbound"),
        format = body.format.as_deref().unwrap_or("PDF"),
        json = json_requested,
        "Processing label request"
    );

    let payload = state.labels.create_label(&body, json_requested).await?;

    info!(elapsed_ms = start.elapsed().as_millis() as u64, "Label request complete");

    Ok(match payload {
        LabelPayload::Binary { bytes, content_type, filename } => HttpResponse::Ok()
            .content_type(content_type)
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(filename)],
            })
            .body(bytes),
        LabelPayload::Json(envelope) => HttpResponse::Ok().json(envelope),
    })
}
