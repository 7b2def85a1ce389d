//! Postal parties on a shipment

/// A validated postal party
///
/// Two exist per shipment: the business itself (from configuration) and the
/// caller's party. Neither is modified after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Party {
    pub name: String,
    pub attention: Option<String>,
    pub phone: Option<String>,
    pub address_line: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl Party {
    /// Name to print for the attention line; the carrier requires one
    pub fn attention_name(&self) -> &str {
        self.attention.as_deref().unwrap_or(&self.name)
    }
}
