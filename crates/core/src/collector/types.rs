//! Types for the trade data collection system.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// The fixed metric schema every record carries.
///
/// Live and synthetic records expose exactly this key set, so consumers never
/// have to branch on provenance to read a field.
pub const METRIC_KEYS: [&str; 5] = ["revenue", "growth_rate", "market_cap", "export", "import"];

/// A single metric: either a scalar or a year-keyed series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Series(BTreeMap<String, f64>),
}

/// Named metrics for one subject.
pub type FieldMap = BTreeMap<String, MetricValue>;

/// Whether a field map satisfies the metric schema.
pub fn conforms_to_schema(fields: &FieldMap) -> bool {
    METRIC_KEYS.iter().all(|key| fields.contains_key(*key))
}

/// Where a record's data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Extracted from the external source.
    Live,
    /// Generated locally after extraction failed.
    Synthetic,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Live => "live",
            Provenance::Synthetic => "synthetic",
        }
    }
}

/// A trade data record for one subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// The subject key this record answers for.
    pub subject_id: String,
    /// Metric values, keyed per [`METRIC_KEYS`].
    pub fields: FieldMap,
    /// Live or synthetic. Always set, never defaulted.
    pub provenance: Provenance,
    /// When this record was created.
    pub generated_at: DateTime<Utc>,
}

/// Errors raised by extraction backends.
///
/// The orchestrator absorbs all of these; they never reach its callers.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("portal connection failed: {0}")]
    ConnectionFailed(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("extraction attempt timed out")]
    Timeout,

    #[error("no data found for subject: {0}")]
    NoData(String),

    #[error("malformed extraction result: {0}")]
    Malformed(String),
}

impl ExtractError {
    /// Stable label for the failure-reason metric.
    pub fn metric_label(&self) -> &'static str {
        match self {
            ExtractError::ConnectionFailed(_) => "connection",
            ExtractError::Http(_) => "http",
            ExtractError::Timeout => "timeout",
            ExtractError::NoData(_) => "no_data",
            ExtractError::Malformed(_) => "malformed",
        }
    }
}

/// Errors surfaced by the orchestrator itself.
///
/// Everything except an invalid key degrades to a synthetic record instead of
/// erroring, so this taxonomy is deliberately small.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("invalid subject key: {0:?}")]
    InvalidKey(String),
}

/// Factory for the shared, expensive-to-create extraction session.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Build the shared session. Called lazily, reused across fetches.
    async fn connect(&self) -> Result<Box<dyn ExtractorSession>, ExtractError>;
}

/// A live session against the external source.
///
/// Owned exclusively by the orchestrator; each `extract` call scopes its own
/// ephemeral request internally.
#[async_trait]
pub trait ExtractorSession: Send + Sync + std::fmt::Debug {
    /// Attempt to extract the metric fields for one subject.
    ///
    /// An empty map and a missing schema key are both treated as failure by
    /// the orchestrator.
    async fn extract(&mut self, subject: &str) -> Result<FieldMap, ExtractError>;

    /// Release any resources held by the session.
    async fn close(&mut self);
}

/// Produces schema-conformant placeholder fields when extraction fails.
///
/// Implementations must be deterministic in *shape* (always the full
/// [`METRIC_KEYS`] set) but are free to randomize values.
pub trait Synthesizer: Send + Sync {
    fn synthesize(&self, subject: &str) -> FieldMap;
}
