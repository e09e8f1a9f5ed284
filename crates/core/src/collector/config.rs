//! Collector configuration.

use serde::{Deserialize, Serialize};

/// Per-fetch tuning for the orchestrator.
///
/// Passed by reference to every fetch call, so callers can override the
/// configured defaults for a single request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// How long a cached record stays valid (milliseconds).
    #[serde(default = "default_ttl_ms")]
    pub ttl_ms: u64,

    /// Budget for a single extraction attempt (milliseconds).
    /// An attempt that exceeds it counts as a failure and is not retried.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Minimum spacing before the next external attempt (milliseconds).
    /// Cache hits neither wait nor reset the spacing clock.
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,
}

fn default_ttl_ms() -> u64 {
    1_800_000 // 30 minutes
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_min_delay_ms() -> u64 {
    2_000
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            ttl_ms: default_ttl_ms(),
            timeout_ms: default_timeout_ms(),
            min_delay_ms: default_min_delay_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CollectorConfig::default();
        assert_eq!(config.ttl_ms, 1_800_000);
        assert_eq!(config.timeout_ms, 30_000);
        assert_eq!(config.min_delay_ms, 2_000);
    }

    #[test]
    fn test_deserialize_minimal() {
        let config: CollectorConfig = toml::from_str("").unwrap();
        assert_eq!(config.ttl_ms, 1_800_000);
        assert_eq!(config.min_delay_ms, 2_000);
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
            ttl_ms = 60000
            timeout_ms = 5000
            min_delay_ms = 500
        "#;
        let config: CollectorConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.ttl_ms, 60_000);
        assert_eq!(config.timeout_ms, 5_000);
        assert_eq!(config.min_delay_ms, 500);
    }
}
