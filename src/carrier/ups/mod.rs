//! UPS Provider Module
//!
//! OAuth token handling, Shipping API wire models and the client.

pub mod auth;
mod client;
mod mapper;
mod models;

pub use auth::CredentialManager;
pub use client::UpsCarrier;
