use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::collector::{CollectorConfig, PortalConfig};
use crate::disclosure::DisclosureConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub disclosure: Option<DisclosureConfig>,
    #[serde(default)]
    pub collector: CollectorSection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            disclosure: None,
            collector: CollectorSection::default(),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    5000
}

/// Collector configuration: per-fetch defaults plus the portal backend.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CollectorSection {
    #[serde(default)]
    pub fetch: CollectorConfig,
    #[serde(default)]
    pub portal: PortalConfig,
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub disclosure: SanitizedDisclosureConfig,
    pub collector: CollectorSection,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedDisclosureConfig {
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            disclosure: SanitizedDisclosureConfig {
                configured: config.disclosure.is_some(),
                base_url: config
                    .disclosure
                    .as_ref()
                    .and_then(|disclosure| disclosure.base_url.clone()),
            },
            collector: config.collector.clone(),
        }
    }
}
