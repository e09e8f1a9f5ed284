//! Trade statistics portal extraction backend.
//!
//! The portal session is the expensive shared resource: a cookie-holding
//! HTTP client that has loaded the landing page once, which is what the
//! search endpoint expects before it will answer.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{ExtractError, Extractor, ExtractorSession, FieldMap};

/// Portal backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Portal base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent sent with every portal request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request navigation timeout in seconds.
    #[serde(default = "default_nav_timeout")]
    pub nav_timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://tradedata.go.kr".to_string()
}

fn default_user_agent() -> String {
    format!("Tradegate/{}", env!("CARGO_PKG_VERSION"))
}

fn default_nav_timeout() -> u64 {
    30
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            nav_timeout_secs: default_nav_timeout(),
        }
    }
}

/// Extraction backend for the trade statistics portal.
pub struct PortalExtractor {
    config: PortalConfig,
}

impl PortalExtractor {
    pub fn new(config: PortalConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Extractor for PortalExtractor {
    fn name(&self) -> &str {
        "tradedata-portal"
    }

    async fn connect(&self) -> Result<Box<dyn ExtractorSession>, ExtractError> {
        let client = Client::builder()
            .user_agent(&self.config.user_agent)
            .cookie_store(true)
            .timeout(Duration::from_secs(self.config.nav_timeout_secs))
            .build()
            .map_err(|e| ExtractError::ConnectionFailed(e.to_string()))?;

        // The landing page sets the session cookies the search endpoint
        // requires.
        let response = client.get(&self.config.base_url).send().await?;
        response.error_for_status()?;

        Ok(Box::new(PortalSession {
            client,
            base_url: self.config.base_url.clone(),
        }))
    }
}

#[derive(Debug)]
struct PortalSession {
    client: Client,
    base_url: String,
}

#[async_trait]
impl ExtractorSession for PortalSession {
    async fn extract(&mut self, subject: &str) -> Result<FieldMap, ExtractError> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("keyword", subject)])
            .send()
            .await?;
        let body = response.error_for_status()?.text().await?;

        debug!("Portal search for '{}' returned {} bytes", subject, body.len());

        // The portal renders its result tables client-side, so the static
        // markup never carries metric values.
        // TODO: call the XHR endpoint the portal frontend uses once it is mapped.
        Err(ExtractError::NoData(subject.to_string()))
    }

    async fn close(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PortalConfig::default();
        assert_eq!(config.base_url, "https://tradedata.go.kr");
        assert_eq!(config.nav_timeout_secs, 30);
        assert!(config.user_agent.starts_with("Tradegate/"));
    }

    #[test]
    fn test_deserialize_minimal() {
        let config: PortalConfig = toml::from_str("").unwrap();
        assert_eq!(config.base_url, "https://tradedata.go.kr");
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
            base_url = "http://localhost:9200"
            user_agent = "test-agent"
            nav_timeout_secs = 5
        "#;
        let config: PortalConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.base_url, "http://localhost:9200");
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.nav_timeout_secs, 5);
    }
}
