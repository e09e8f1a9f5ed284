//! Configuration loading and validation.
//!
//! Config comes from a TOML file merged with `TRADEGATE_`-prefixed
//! environment variables; secrets never leave the process unredacted.

mod loader;
mod types;
mod validate;

use thiserror::Error;

pub use loader::{load_config, load_config_from_str};
pub use types::{
    CollectorSection, Config, SanitizedConfig, SanitizedDisclosureConfig, ServerConfig,
};
pub use validate::validate_config;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(String),

    #[error("failed to parse config: {0}")]
    ParseError(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}
