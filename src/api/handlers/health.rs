//! Service banner and health check endpoints

use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::AppState;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Carrier environment ("sandbox" or "production")
    pub env: String,
    /// Carrier API base URL
    pub base: String,
}

#[derive(Serialize, ToSchema)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub env: String,
}

/// GET /health - Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        env: state.settings.carrier.env.clone(),
        base: state.labels.carrier().base_url().to_string(),
    })
}

/// GET / - Service identity
#[utoipa::path(
    get,
    path = "/",
    tag = "system",
    responses(
        (status = 200, description = "Service name and version", body = ServiceInfo)
    )
)]
pub async fn service_info(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ServiceInfo {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        env: state.settings.carrier.env.clone(),
    })
}
