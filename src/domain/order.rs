//! Caller-supplied label order
//!
//! Everything here is untrusted input; the request builder decides what is
//! required and what falls back to business defaults.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Postal address as posted by the caller
///
/// Fields are optional at the wire level so that a missing field surfaces as
/// a validation error naming the field rather than a JSON decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AddressInput {
    pub name: Option<String>,
    pub addr1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
}

/// Body of `POST /labels/create`
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LabelOrder {
    /// The caller's party: recipient for outbound, sender for returns
    #[serde(default)]
    pub to: Option<AddressInput>,
    /// Package weight in pounds (default 1)
    #[serde(default)]
    pub weight_lbs: Option<f64>,
    /// "PDF" or "GIF" (default PDF)
    #[serde(default)]
    pub format: Option<String>,
    /// "outbound" or "return" (default outbound)
    #[serde(default)]
    pub mode: Option<String>,
    /// Carrier service code override
    #[serde(default)]
    pub service_code: Option<String>,
    /// Free-text package reference
    #[serde(default)]
    pub reference: Option<String>,
}
