//! Core library for the tradegate financial data gateway.
//!
//! Two halves: the `collector` fetches trade metrics through a shared portal
//! session with caching and synthetic fallback, and the `disclosure` module
//! proxies the external financial disclosure REST API.

pub mod collector;
pub mod config;
pub mod disclosure;
pub mod metrics;
pub mod testing;

pub use collector::{
    CollectError, CollectorConfig, ExtractError, Extractor, ExtractorSession, FetchOrchestrator,
    FieldMap, MetricValue, PortalConfig, PortalExtractor, Provenance, Record, RecordCache,
    Synthesizer, TradeSynthesizer, METRIC_KEYS,
};
pub use config::{
    load_config, load_config_from_str, validate_config, CollectorSection, Config, ConfigError,
    SanitizedConfig, ServerConfig,
};
pub use disclosure::{
    report_code_name, DisclosureClient, DisclosureConfig, DisclosureError, FinancialQuery,
    ReportCode, REPORT_CODES,
};
