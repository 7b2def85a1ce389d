//! Label engine
//!
//! This module contains the label pipeline:
//! - Shipment request building from caller input and business constants
//! - Sender banner overlay for PDF labels
//! - Response packaging

pub mod builder;
mod error;
pub mod overlay;
pub mod packager;
mod pipeline;

pub use error::LabelError;
pub use packager::{LabelEnvelope, LabelPayload};
pub use pipeline::LabelService;
