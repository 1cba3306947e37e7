//! TOML file configuration structures.
//!
//! These structs directly map to the `paylink-config.toml` file format.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    pub server: ServerConfig,
    pub payment: PaymentConfig,
    #[serde(default)]
    pub rates: RatesConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

fn default_listen_addr() -> SocketAddr {
    "0.0.0.0:8080".parse().expect("valid default address")
}

/// Payment-link configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// Base URL the payment page is served from; issued links are
    /// `<link_base>/pay/<uuid>`.
    pub link_base: Url,
}

/// Exchange-rate source configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatesConfig {
    /// Simple-price endpoint queried for the USDT rate.
    #[serde(default = "default_rates_endpoint")]
    pub endpoint: Url,
    /// Hard timeout for each rate lookup, in seconds.
    #[serde(default = "default_rates_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            endpoint: default_rates_endpoint(),
            timeout_secs: default_rates_timeout_secs(),
        }
    }
}

fn default_rates_endpoint() -> Url {
    Url::parse("https://api.coingecko.com/api/v3/simple/price").expect("valid default endpoint")
}

fn default_rates_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parsing() {
        let toml_str = r#"
[server]
listen = "127.0.0.1:3000"

[payment]
link_base = "https://pay.example.com"

[rates]
endpoint = "https://api.coingecko.com/api/v3/simple/price"
timeout_secs = 5
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.listen.port(), 3000);
        assert_eq!(config.payment.link_base.as_str(), "https://pay.example.com/");
        assert_eq!(config.rates.timeout_secs, 5);
    }

    #[test]
    fn test_rates_section_is_optional() {
        let toml_str = r#"
[server]
listen = "127.0.0.1:3000"

[payment]
link_base = "https://pay.example.com"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.rates.timeout_secs, 10);
        assert!(config.rates.endpoint.as_str().contains("coingecko"));
    }
}
