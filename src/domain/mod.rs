//! Domain types and models

mod order;
mod party;
mod shipment;
pub mod reference;

pub use order::{AddressInput, LabelOrder};
pub use party::Party;
pub use shipment::{
    DeclaredValue, Dimensions, LabelFormat, Mode, PackageSpec, Service, ShipmentRequest,
    ShipmentResult, Shipper,
};
