//! Prometheus metrics for core components.
//!
//! Covers the collector (cache, extraction attempts, fallbacks, portal
//! sessions) and the disclosure API client.

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Collector Metrics
// =============================================================================

/// Fetch results by provenance.
pub static FETCH_RESULTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("tradegate_fetch_results_total", "Total fetch results"),
        &["provenance"], // "live", "synthetic"
    )
    .unwrap()
});

/// Cache hits total.
pub static CACHE_HITS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("tradegate_cache_hits_total", "Total record cache hits").unwrap()
});

/// Cache misses total.
pub static CACHE_MISSES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("tradegate_cache_misses_total", "Total record cache misses").unwrap()
});

/// Extraction failures by reason.
pub static EXTRACTION_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "tradegate_extraction_failures_total",
            "Total extraction failures that degraded to synthetic records",
        ),
        &["reason"], // "connection", "http", "timeout", "no_data", "malformed"
    )
    .unwrap()
});

/// Extraction attempt duration in seconds.
pub static EXTRACTION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "tradegate_extraction_duration_seconds",
            "Duration of extraction attempts",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["result"], // "ok", "error"
    )
    .unwrap()
});

/// Portal session acquisitions by result.
pub static SESSION_ACQUISITIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "tradegate_session_acquisitions_total",
            "Total portal session acquisition attempts",
        ),
        &["result"], // "ok", "error", "timeout"
    )
    .unwrap()
});

// =============================================================================
// Disclosure API Metrics
// =============================================================================

/// Disclosure API requests by operation and status.
pub static DISCLOSURE_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "tradegate_disclosure_requests_total",
            "Total disclosure API requests",
        ),
        &["operation", "status"], // status: "success", "error"
    )
    .unwrap()
});

/// Disclosure API request duration in seconds.
pub static DISCLOSURE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "tradegate_disclosure_duration_seconds",
            "Duration of disclosure API calls",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["operation"],
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Collector
        Box::new(FETCH_RESULTS.clone()),
        Box::new(CACHE_HITS.clone()),
        Box::new(CACHE_MISSES.clone()),
        Box::new(EXTRACTION_FAILURES.clone()),
        Box::new(EXTRACTION_DURATION.clone()),
        Box::new(SESSION_ACQUISITIONS.clone()),
        // Disclosure
        Box::new(DISCLOSURE_REQUESTS.clone()),
        Box::new(DISCLOSURE_DURATION.clone()),
    ]
}
