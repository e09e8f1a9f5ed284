//! Financial disclosure API client.
//!
//! Thin proxy over the disclosure REST API: requests are forwarded with the
//! configured key and the upstream body is returned verbatim, XML and all.
//! Parsing the report schema is the caller's concern.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::debug;

use crate::metrics;

use super::types::{DisclosureError, FinancialQuery};

/// Disclosure API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisclosureConfig {
    /// API key issued by the disclosure service.
    pub api_key: String,

    /// Base URL override (default: the public disclosure API).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

/// Client for the financial disclosure REST API.
pub struct DisclosureClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl DisclosureClient {
    pub fn new(config: DisclosureConfig) -> Result<Self, DisclosureError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| "https://opendart.fss.or.kr/api".to_string());

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
        })
    }

    /// Fetch periodic-report financials, returning the raw XML body.
    pub async fn fetch_financials(&self, query: &FinancialQuery) -> Result<String, DisclosureError> {
        query.validate()?;

        let url = format!("{}/fnlttSinglAcnt.xml", self.base_url);
        debug!(
            "Disclosure financials request: corp_code={}, year={}, report={}",
            query.corp_code, query.bsns_year, query.reprt_code
        );

        let started = Instant::now();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("crtfc_key", self.api_key.as_str()),
                ("corp_code", query.corp_code.as_str()),
                ("bsns_year", query.bsns_year.as_str()),
                ("reprt_code", query.reprt_code.as_str()),
            ])
            .send()
            .await;

        metrics::DISCLOSURE_DURATION
            .with_label_values(&["financials"])
            .observe(started.elapsed().as_secs_f64());

        let response = self.checked("financials", response).await?;
        Ok(response.text().await?)
    }

    /// Fetch the company registry index, returning the raw bytes.
    pub async fn fetch_company_index(&self) -> Result<Vec<u8>, DisclosureError> {
        let url = format!("{}/corpCode.xml", self.base_url);

        let started = Instant::now();
        let response = self
            .client
            .get(&url)
            .query(&[("crtfc_key", self.api_key.as_str())])
            .send()
            .await;

        metrics::DISCLOSURE_DURATION
            .with_label_values(&["company_index"])
            .observe(started.elapsed().as_secs_f64());

        let response = self.checked("company_index", response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Map transport and status errors into the error taxonomy, tracking the
    /// request counter per operation.
    async fn checked(
        &self,
        operation: &str,
        response: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<reqwest::Response, DisclosureError> {
        let outcome = match response {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    Ok(response)
                } else {
                    let message = response.text().await.unwrap_or_default();
                    Err(DisclosureError::ApiError {
                        status: status.as_u16(),
                        message,
                    })
                }
            }
            Err(e) => Err(DisclosureError::Http(e)),
        };

        let label = if outcome.is_ok() { "success" } else { "error" };
        metrics::DISCLOSURE_REQUESTS
            .with_label_values(&[operation, label])
            .inc();
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let toml = r#"api_key = "secret""#;
        let config: DisclosureConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.api_key, "secret");
        assert!(config.base_url.is_none());
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_config_full() {
        let toml = r#"
            api_key = "secret"
            base_url = "http://localhost:9999/api"
            timeout_secs = 5
        "#;
        let config: DisclosureConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:9999/api"));
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_client_uses_default_base_url() {
        let client = DisclosureClient::new(DisclosureConfig {
            api_key: "secret".to_string(),
            base_url: None,
            timeout_secs: 30,
        })
        .unwrap();
        assert_eq!(client.base_url, "https://opendart.fss.or.kr/api");
    }

    #[tokio::test]
    async fn test_fetch_financials_rejects_invalid_query() {
        let client = DisclosureClient::new(DisclosureConfig {
            api_key: "secret".to_string(),
            base_url: Some("http://localhost:1".to_string()),
            timeout_secs: 1,
        })
        .unwrap();

        let query = FinancialQuery {
            corp_code: "bad".to_string(),
            bsns_year: "2023".to_string(),
            reprt_code: "11011".to_string(),
        };

        // Validation fails before any request is issued.
        let err = client.fetch_financials(&query).await.unwrap_err();
        assert!(matches!(err, DisclosureError::InvalidQuery(_)));
    }
}
