use super::{types::Config, ConfigError};

/// Sanity checks beyond what deserialization enforces.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if let Some(ref disclosure) = config.disclosure {
        if disclosure.api_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "disclosure.api_key must not be empty".to_string(),
            ));
        }
    }

    if config.collector.fetch.ttl_ms == 0 {
        return Err(ConfigError::Invalid(
            "collector.fetch.ttl_ms must be positive".to_string(),
        ));
    }
    if config.collector.fetch.timeout_ms == 0 {
        return Err(ConfigError::Invalid(
            "collector.fetch.timeout_ms must be positive".to_string(),
        ));
    }

    if !config.collector.portal.base_url.starts_with("http") {
        return Err(ConfigError::Invalid(format!(
            "collector.portal.base_url must be an http(s) URL, got {:?}",
            config.collector.portal.base_url
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disclosure::DisclosureConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let mut config = Config::default();
        config.disclosure = Some(DisclosureConfig {
            api_key: "  ".to_string(),
            base_url: None,
            timeout_secs: 30,
        });
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let mut config = Config::default();
        config.collector.fetch.ttl_ms = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::default();
        config.collector.fetch.timeout_ms = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_bad_portal_url_rejected() {
        let mut config = Config::default();
        config.collector.portal.base_url = "ftp://example.com".to_string();
        assert!(validate_config(&config).is_err());
    }
}
