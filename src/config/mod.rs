//! Configuration module for the label service

use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};
use std::path::PathBuf;

const SANDBOX_BASE_URL: &str = "https://wwwcie.ups.com";
const PRODUCTION_BASE_URL: &str = "https://onlinetools.ups.com";

/// Main application settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub carrier: CarrierSettings,
    pub business: BusinessSettings,
    pub labels: LabelSettings,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// UPS API access
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CarrierSettings {
    /// "sandbox" or "production"
    pub env: String,
    /// Overrides the base URL derived from `env`
    pub base_url: Option<String>,
    pub client_id: String,
    pub client_secret: String,
    pub token_path: String,
    pub ship_path: String,
    /// Sent as the `transactionSrc` header on shipment calls
    pub transaction_src: String,
    pub timeout_secs: u64,
    pub auth_timeout_secs: u64,
}

/// Fixed shipper identity and package policy
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BusinessSettings {
    pub shipper_number: String,
    pub promo_code: Option<String>,
    pub service_code: String,
    pub service_description: String,
    pub address: AddressSettings,
    pub package: PackageSettings,
}

/// The business's own postal address
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AddressSettings {
    pub name: String,
    pub attention: Option<String>,
    pub phone: Option<String>,
    pub address_line: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// Package constants applied to every shipment
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PackageSettings {
    pub packaging_code: String,
    pub description: String,
    pub length: String,
    pub width: String,
    pub height: String,
    pub dimension_unit: String,
    pub weight_unit: String,
    pub declared_value: String,
    pub currency: String,
}

/// Label post-processing options
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LabelSettings {
    /// Stamp the sender's name onto PDF labels
    pub sender_banner: bool,
    pub banner_prefix: String,
}

impl Settings {
    /// Load configuration from files and environment variables
    ///
    /// Configuration priority (highest to lowest):
    /// 1. Environment variables (prefixed with PRL_)
    /// 2. config/local.toml (gitignored)
    /// 3. config/default.toml
    pub fn load() -> Result<Self, ConfigError> {
        let config_dir = std::env::var("CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config"));

        let builder = Config::builder()
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            // PRL_CARRIER__CLIENT_ID, PRL_BUSINESS__SHIPPER_NUMBER, etc.
            .add_source(
                Environment::with_prefix("PRL")
                    .separator("__")
                    .try_parsing(true)
            );

        builder.build()?.try_deserialize()
    }
}

impl CarrierSettings {
    /// Base URL for both the identity and shipping endpoints
    pub fn base_url(&self) -> String {
        if let Some(url) = self.base_url.as_deref().filter(|u| !u.is_empty()) {
            return url.trim_end_matches('/').to_string();
        }
        match self.env.to_ascii_lowercase().as_str() {
            "production" | "prod" => PRODUCTION_BASE_URL.to_string(),
            _ => SANDBOX_BASE_URL.to_string(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            host: "0.0.0.0".to_string(),
            port: 8000,
            workers: None,
        }
    }
}

impl Default for CarrierSettings {
    fn default() -> Self {
        CarrierSettings {
            env: "sandbox".to_string(),
            base_url: None,
            client_id: String::new(),
            client_secret: String::new(),
            token_path: "/security/v1/oauth/token".to_string(),
            ship_path: "/api/shipments/v1/ship".to_string(),
            transaction_src: "prl-label-service".to_string(),
            timeout_secs: 45,
            auth_timeout_secs: 30,
        }
    }
}

impl Default for BusinessSettings {
    fn default() -> Self {
        BusinessSettings {
            shipper_number: String::new(),
            promo_code: None,
            service_code: "03".to_string(),
            service_description: "Ground".to_string(),
            address: AddressSettings::default(),
            package: PackageSettings::default(),
        }
    }
}

impl Default for AddressSettings {
    fn default() -> Self {
        AddressSettings {
            name: "First Impressions Dental Lab".to_string(),
            attention: None,
            phone: None,
            address_line: "700 N Neely St Suite 17".to_string(),
            city: "Gilbert".to_string(),
            state: "AZ".to_string(),
            postal_code: "85233".to_string(),
            country: "US".to_string(),
        }
    }
}

impl Default for PackageSettings {
    fn default() -> Self {
        PackageSettings {
            packaging_code: "02".to_string(),
            description: "Dental case".to_string(),
            length: "10".to_string(),
            width: "8".to_string(),
            height: "4".to_string(),
            dimension_unit: "IN".to_string(),
            weight_unit: "LBS".to_string(),
            declared_value: "100.00".to_string(),
            currency: "USD".to_string(),
        }
    }
}

impl Default for LabelSettings {
    fn default() -> Self {
        LabelSettings {
            sender_banner: true,
            banner_prefix: "FROM:".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_from_env() {
        let mut carrier = CarrierSettings::default();
        assert_eq!(carrier.base_url(), SANDBOX_BASE_URL);

        carrier.env = "Production".to_string();
        assert_eq!(carrier.base_url(), PRODUCTION_BASE_URL);
    }

    #[test]
    fn test_base_url_override_wins() {
        let carrier = CarrierSettings {
            base_url: Some("http://127.0.0.1:9000/".to_string()),
            ..Default::default()
        };
        assert_eq!(carrier.base_url(), "http://127.0.0.1:9000");
    }

    #[test]
    fn test_defaults_leave_account_unset() {
        let settings = Settings::default();
        assert!(settings.business.shipper_number.is_empty());
        assert_eq!(settings.business.service_code, "03");
        assert!(settings.labels.sender_banner);
    }
}
