//! PRL Label Service
//!
//! Requests UPS shipping and return labels for a single business and hands
//! them back as PDF/GIF downloads or JSON, stamping the physical sender onto
//! PDF labels.

use actix_web::{web, App, HttpServer, middleware};
use anyhow::Context;
use tracing::info;
use tracing_actix_web::TracingLogger;
use std::sync::Arc;

mod api;
mod carrier;
mod config;
mod domain;
mod engine;
#[cfg(test)]
mod test_support;

use crate::carrier::{LabelCarrier, UpsCarrier};
use crate::config::Settings;
use crate::engine::LabelService;

/// Application state shared across all handlers
pub struct AppState {
    pub settings: Settings,
    pub labels: LabelService,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber for structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prl_label_service=info,actix_web=info".into())
        )
        .json()
        .init();

    let settings = Settings::load().context("Failed to load configuration")?;
    let bind_addr = format!("{}:{}", settings.server.host, settings.server.port);

    let carrier: Arc<dyn LabelCarrier> =
        Arc::new(UpsCarrier::new(&settings.carrier).context("Failed to create UPS client")?);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = %settings.carrier.env,
        carrier = carrier.code(),
        base = %carrier.base_url(),
        "Starting PRL label service on {}",
        bind_addr
    );

    if settings.business.shipper_number.trim().is_empty() {
        tracing::warn!("No shipper account number configured; label requests will fail");
    }

    let workers = settings.server.workers.unwrap_or_else(|| num_cpus::get() * 2);

    let app_state = web::Data::new(AppState {
        labels: LabelService::new(carrier, &settings),
        settings,
    });

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(TracingLogger::default())
            .wrap(middleware::Compress::default())
            .wrap(
                middleware::DefaultHeaders::new()
                    .add(("X-Service", env!("CARGO_PKG_NAME")))
                    .add(("X-Version", env!("CARGO_PKG_VERSION")))
            )
            .configure(api::configure_routes)
    })
    .workers(workers)
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}
