//! Carrier credential probe

use actix_web::{web, HttpResponse};
use serde::Serialize;
use tracing::{error, info};
use utoipa::ToSchema;

use crate::api::error::ErrorResponse;
use crate::AppState;

#[derive(Serialize, ToSchema)]
pub struct TokenTestResponse {
    pub ok: bool,
    /// Seconds until the token expires
    pub ttl: i64,
    /// First characters of the token, never the whole value
    pub preview: String,
    pub env: String,
}

/// GET /token-test - Check that carrier credentials work
#[utoipa::path(
    get,
    path = "/token-test",
    tag = "system",
    responses(
        (status = 200, description = "Token obtained", body = TokenTestResponse),
        (status = 500, description = "Credential exchange failed", body = ErrorResponse)
    )
)]
pub async fn token_test(state: web::Data<AppState>) -> HttpResponse {
    match state.labels.carrier().access_token().await {
        Ok(token) => {
            info!(ttl_seconds = token.ttl_seconds, "Carrier token probe succeeded");
            HttpResponse::Ok().json(TokenTestResponse {
                ok: true,
                ttl: token.ttl_seconds,
                preview: token.preview(),
                env: state.settings.carrier.env.clone(),
            })
        }
        Err(e) => {
            error!(error = %e, "Carrier token probe failed");
            HttpResponse::InternalServerError().json(ErrorResponse::new(e.to_string()))
        }
    }
}
