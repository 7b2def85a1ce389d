//! Carrier Integration Module
//!
//! ```text
//!                 ┌─────────────────────┐
//!                 │  LabelCarrier Trait │
//!                 └──────────┬──────────┘
//!                            │
//!                      ┌─────┴─────┐
//!                      │    UPS    │
//!                      └─────┬─────┘
//!              ┌─────────────┼─────────────┐
//!          ┌───┴───┐    ┌────┴───┐    ┌────┴───┐
//!          │ auth  │    │ mapper │    │ client │
//!          └───────┘    └────────┘    └────────┘
//! ```

pub mod traits;
pub mod http_client;
pub mod ups;

pub use traits::{AccessToken, CarrierError, CarrierResult, LabelCarrier};
pub use ups::UpsCarrier;
