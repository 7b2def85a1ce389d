//! OpenAPI 3.0 specification definition

use utoipa::OpenApi;

use crate::api::error::ErrorResponse;
use crate::api::handlers::{
    health::{HealthResponse, ServiceInfo},
    token::TokenTestResponse,
};
use crate::domain::{AddressInput, LabelFormat, LabelOrder, Mode};
use crate::engine::LabelEnvelope;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "PRL Label Service API",
        version = "1.0.0",
        description = "Creates UPS shipping and return labels and stamps the sender onto PDF labels",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/", description = "Current server")
    ),
    tags(
        (name = "system", description = "Service identity, health and credential checks"),
        (name = "labels", description = "Label creation")
    ),
    paths(
        crate::api::handlers::health::service_info,
        crate::api::handlers::health::health_check,
        crate::api::handlers::token::token_test,
        crate::api::handlers::labels::create_label,
    ),
    components(
        schemas(
            HealthResponse,
            ServiceInfo,
            TokenTestResponse,
            ErrorResponse,
            LabelOrder,
            AddressInput,
            LabelEnvelope,
            LabelFormat,
            Mode,
        )
    )
)]
pub struct ApiDoc;
