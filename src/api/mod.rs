//! API module - HTTP routes and handlers

pub mod error;
pub mod handlers;
pub mod openapi;

use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::openapi::ApiDoc;

/// Configure all API routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(error::json_config())
        .route("/", web::get().to(handlers::health::service_info))
        .route("/health", web::get().to(handlers::health::health_check))
        .route("/token-test", web::get().to(handlers::token::token_test))
        .service(
            web::scope("/labels")
                .route("/create", web::post().to(handlers::labels::create_label))
        )
        // Swagger UI and OpenAPI document
        .service(
            SwaggerUi::new("/swagger-ui/{_:.*}")
                .url("/api-docs/openapi.json", ApiDoc::openapi())
        );
}
