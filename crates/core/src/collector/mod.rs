//! Resilient trade data collection.
//!
//! The orchestrator fetches per-subject metric records through a shared
//! portal session, caches results with a TTL, spaces out external attempts,
//! and degrades to synthetic records when extraction fails. Degradation is
//! visible to callers only through each record's provenance tag.

mod cache;
mod config;
mod orchestrator;
mod portal;
mod synthetic;
mod types;

pub use cache::RecordCache;
pub use config::CollectorConfig;
pub use orchestrator::FetchOrchestrator;
pub use portal::{PortalConfig, PortalExtractor};
pub use synthetic::TradeSynthesizer;
pub use types::*;
