//! Fetch orchestrator implementation.
//!
//! Drives each subject through: cache lookup, shared session acquisition,
//! one bounded extraction attempt, synthetic fallback on any failure, cache
//! write. External attempts are serialized through a single lock and spaced
//! out by a minimum delay; the only error callers ever see is an invalid
//! subject key.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::time::{sleep, timeout, Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::metrics;

use super::cache::RecordCache;
use super::config::CollectorConfig;
use super::synthetic::TradeSynthesizer;
use super::types::{
    conforms_to_schema, CollectError, ExtractError, Extractor, ExtractorSession, FieldMap,
    Provenance, Record, Synthesizer,
};

/// Shared portal session plus the spacing clock.
///
/// Both live behind one lock so no two external attempts ever overlap and
/// the spacing between them is measured consistently.
struct SessionSlot {
    handle: Option<Box<dyn ExtractorSession>>,
    last_attempt: Option<Instant>,
}

/// The fetch orchestrator: cache, rate limiting, synthetic fallback.
pub struct FetchOrchestrator {
    extractor: Arc<dyn Extractor>,
    synthesizer: Arc<dyn Synthesizer>,
    cache: RecordCache,
    session: Mutex<SessionSlot>,
}

impl FetchOrchestrator {
    /// Create an orchestrator with the default synthesizer.
    pub fn new(extractor: Arc<dyn Extractor>) -> Self {
        Self {
            extractor,
            synthesizer: Arc::new(TradeSynthesizer::new()),
            cache: RecordCache::new(),
            session: Mutex::new(SessionSlot {
                handle: None,
                last_attempt: None,
            }),
        }
    }

    /// Replace the default synthesizer.
    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn Synthesizer>) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    /// Fetch one subject, consulting the cache first.
    pub async fn fetch_one(
        &self,
        subject: &str,
        config: &CollectorConfig,
    ) -> Result<Record, CollectError> {
        self.fetch_one_until(subject, config, None).await
    }

    /// Like [`FetchOrchestrator::fetch_one`], bounded by a caller-supplied
    /// deadline. When the deadline elapses, the in-flight attempt is
    /// abandoned and the result degrades to a synthetic record; no partial
    /// cache entry is written.
    pub async fn fetch_one_until(
        &self,
        subject: &str,
        config: &CollectorConfig,
        deadline: Option<Instant>,
    ) -> Result<Record, CollectError> {
        validate_subject(subject)?;

        // Fast path: a valid cache entry short-circuits with no external
        // side effects and no delay.
        if let Some(record) = self.cache.get(subject, config.ttl_ms).await {
            metrics::CACHE_HITS.inc();
            return Ok(record);
        }
        metrics::CACHE_MISSES.inc();

        let mut slot = self.session.lock().await;

        // Another fetch may have filled the cache while we waited for the slot.
        if let Some(record) = self.cache.get(subject, config.ttl_ms).await {
            metrics::CACHE_HITS.inc();
            return Ok(record);
        }

        let outcome = self.attempt(&mut slot, subject, config, deadline).await;
        drop(slot);

        let record = match outcome {
            Ok(fields) => Record {
                subject_id: subject.to_string(),
                fields,
                provenance: Provenance::Live,
                generated_at: Utc::now(),
            },
            Err(e) => {
                warn!("Extraction failed for '{}', degrading to synthetic: {}", subject, e);
                metrics::EXTRACTION_FAILURES
                    .with_label_values(&[e.metric_label()])
                    .inc();
                Record {
                    subject_id: subject.to_string(),
                    fields: self.synthesizer.synthesize(subject),
                    provenance: Provenance::Synthetic,
                    generated_at: Utc::now(),
                }
            }
        };

        metrics::FETCH_RESULTS
            .with_label_values(&[record.provenance.as_str()])
            .inc();

        // Synthetic results are cached too, so a failing subject is not
        // re-attempted within the TTL window.
        self.cache.insert(record.clone()).await;

        Ok(record)
    }

    /// Fetch a batch of subjects strictly in order, one at a time.
    ///
    /// Returns exactly one record per subject, in input order. A per-subject
    /// failure degrades to a synthetic record and never aborts the batch.
    pub async fn fetch_batch(
        &self,
        subjects: &[String],
        config: &CollectorConfig,
    ) -> Result<Vec<Record>, CollectError> {
        self.fetch_batch_until(subjects, config, None).await
    }

    /// Deadline-bounded variant of [`FetchOrchestrator::fetch_batch`].
    pub async fn fetch_batch_until(
        &self,
        subjects: &[String],
        config: &CollectorConfig,
        deadline: Option<Instant>,
    ) -> Result<Vec<Record>, CollectError> {
        // Reject the whole batch up front, before any side effects.
        for subject in subjects {
            validate_subject(subject)?;
        }

        let mut records = Vec::with_capacity(subjects.len());
        for subject in subjects {
            records.push(self.fetch_one_until(subject, config, deadline).await?);
        }
        Ok(records)
    }

    /// Drop one cache entry. Returns whether one was present.
    pub async fn invalidate(&self, subject: &str) -> bool {
        self.cache.invalidate(subject).await
    }

    /// Drop every cache entry. Leaves the portal session untouched.
    pub async fn clear_cache(&self) {
        self.cache.clear().await
    }

    /// Number of cached entries, expired ones included.
    pub async fn cache_len(&self) -> usize {
        self.cache.len().await
    }

    /// Release the portal session if held. Idempotent; the next fetch
    /// re-acquires lazily.
    pub async fn shutdown(&self) {
        let mut slot = self.session.lock().await;
        if let Some(mut handle) = slot.handle.take() {
            handle.close().await;
            info!("Portal session released");
        }
    }

    /// One spaced, bounded extraction attempt against the shared session.
    async fn attempt(
        &self,
        slot: &mut SessionSlot,
        subject: &str,
        config: &CollectorConfig,
        deadline: Option<Instant>,
    ) -> Result<FieldMap, ExtractError> {
        wait_out_spacing(slot, subject, config, deadline).await?;

        let result = self
            .attempt_extraction(slot, subject, config, deadline)
            .await;

        // Spacing is measured from the completion of the external attempt.
        slot.last_attempt = Some(Instant::now());
        result
    }

    async fn attempt_extraction(
        &self,
        slot: &mut SessionSlot,
        subject: &str,
        config: &CollectorConfig,
        deadline: Option<Instant>,
    ) -> Result<FieldMap, ExtractError> {
        if slot.handle.is_none() {
            slot.handle = Some(self.acquire_session(config, deadline).await?);
        }
        let Some(handle) = slot.handle.as_mut() else {
            // Unreachable: acquisition either filled the slot or returned.
            return Err(ExtractError::ConnectionFailed(
                "portal session missing".to_string(),
            ));
        };

        let budget = attempt_budget(config.timeout_ms, deadline)?;
        let started = Instant::now();

        let outcome = match timeout(budget, handle.extract(subject)).await {
            Ok(Ok(fields)) if fields.is_empty() => Err(ExtractError::NoData(subject.to_string())),
            Ok(Ok(fields)) if !conforms_to_schema(&fields) => Err(ExtractError::Malformed(
                format!("incomplete schema for '{}'", subject),
            )),
            Ok(Ok(fields)) => Ok(fields),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(ExtractError::Timeout),
        };

        let label = if outcome.is_ok() { "ok" } else { "error" };
        metrics::EXTRACTION_DURATION
            .with_label_values(&[label])
            .observe(started.elapsed().as_secs_f64());

        outcome
    }

    /// Build the shared session, bounded by the attempt timeout and deadline.
    ///
    /// Atomic from the caller's perspective: either the slot ends up `Ready`
    /// or the failure is reported and the slot stays empty.
    async fn acquire_session(
        &self,
        config: &CollectorConfig,
        deadline: Option<Instant>,
    ) -> Result<Box<dyn ExtractorSession>, ExtractError> {
        debug!("Acquiring portal session via {}", self.extractor.name());
        let budget = attempt_budget(config.timeout_ms, deadline)?;

        match timeout(budget, self.extractor.connect()).await {
            Ok(Ok(handle)) => {
                metrics::SESSION_ACQUISITIONS
                    .with_label_values(&["ok"])
                    .inc();
                info!("Portal session ready ({})", self.extractor.name());
                Ok(handle)
            }
            Ok(Err(e)) => {
                metrics::SESSION_ACQUISITIONS
                    .with_label_values(&["error"])
                    .inc();
                // Repeated occurrences here point at the portal being down,
                // not at a per-subject miss.
                error!(
                    "Portal session unavailable ({}): {}",
                    self.extractor.name(),
                    e
                );
                Err(e)
            }
            Err(_) => {
                metrics::SESSION_ACQUISITIONS
                    .with_label_values(&["timeout"])
                    .inc();
                error!(
                    "Portal session acquisition timed out ({})",
                    self.extractor.name()
                );
                Err(ExtractError::Timeout)
            }
        }
    }
}

fn validate_subject(subject: &str) -> Result<(), CollectError> {
    if subject.trim().is_empty() {
        return Err(CollectError::InvalidKey(subject.to_string()));
    }
    Ok(())
}

/// Wait out the minimum spacing since the last external attempt.
///
/// Cache hits never reach this point, so they neither wait nor reset the
/// clock. If the deadline would elapse before the spacing does, the attempt
/// is abandoned immediately.
async fn wait_out_spacing(
    slot: &SessionSlot,
    subject: &str,
    config: &CollectorConfig,
    deadline: Option<Instant>,
) -> Result<(), ExtractError> {
    let Some(last) = slot.last_attempt else {
        return Ok(());
    };

    let min_delay = Duration::from_millis(config.min_delay_ms);
    let elapsed = last.elapsed();
    if elapsed >= min_delay {
        return Ok(());
    }

    let wait = min_delay - elapsed;
    if let Some(deadline) = deadline {
        if deadline.saturating_duration_since(Instant::now()) <= wait {
            return Err(ExtractError::Timeout);
        }
    }

    debug!("Spacing out external attempts: waiting {:?} before '{}'", wait, subject);
    sleep(wait).await;
    Ok(())
}

/// Budget for the next suspension point: the per-attempt timeout, clipped to
/// whatever remains of the caller's deadline.
fn attempt_budget(timeout_ms: u64, deadline: Option<Instant>) -> Result<Duration, ExtractError> {
    let budget = Duration::from_millis(timeout_ms);
    match deadline {
        Some(deadline) => {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                Err(ExtractError::Timeout)
            } else {
                Ok(budget.min(remaining))
            }
        }
        None => Ok(budget),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockExtractor;

    #[tokio::test]
    async fn test_invalid_key_fails_fast() {
        let extractor = Arc::new(MockExtractor::new());
        let orchestrator = FetchOrchestrator::new(Arc::clone(&extractor) as Arc<dyn Extractor>);
        let config = CollectorConfig::default();

        for bad in ["", "   "] {
            let err = orchestrator.fetch_one(bad, &config).await.unwrap_err();
            assert!(matches!(err, CollectError::InvalidKey(_)));
        }

        // No cache mutation, no resource acquisition.
        assert_eq!(orchestrator.cache_len().await, 0);
        assert_eq!(extractor.connect_count(), 0);
    }

    #[tokio::test]
    async fn test_batch_with_invalid_key_rejects_before_side_effects() {
        let extractor = Arc::new(MockExtractor::new());
        let orchestrator = FetchOrchestrator::new(Arc::clone(&extractor) as Arc<dyn Extractor>);
        let config = CollectorConfig::default();

        let subjects = vec!["good".to_string(), "".to_string()];
        let err = orchestrator
            .fetch_batch(&subjects, &config)
            .await
            .unwrap_err();
        assert!(matches!(err, CollectError::InvalidKey(_)));
        assert_eq!(extractor.extract_count(), 0);
        assert_eq!(orchestrator.cache_len().await, 0);
    }

    #[tokio::test]
    async fn test_shutdown_without_session_is_a_noop() {
        let extractor = Arc::new(MockExtractor::new());
        let orchestrator = FetchOrchestrator::new(Arc::clone(&extractor) as Arc<dyn Extractor>);

        orchestrator.shutdown().await;
        orchestrator.shutdown().await;
        assert_eq!(extractor.close_count(), 0);
    }

    #[test]
    fn test_attempt_budget_without_deadline() {
        let budget = attempt_budget(5_000, None).unwrap();
        assert_eq!(budget, Duration::from_millis(5_000));
    }

    #[test]
    fn test_attempt_budget_clips_to_deadline() {
        let deadline = Instant::now() + Duration::from_millis(100);
        let budget = attempt_budget(30_000, Some(deadline)).unwrap();
        assert!(budget <= Duration::from_millis(100));
    }

    #[test]
    fn test_attempt_budget_elapsed_deadline() {
        let deadline = Instant::now();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(matches!(
            attempt_budget(30_000, Some(deadline)),
            Err(ExtractError::Timeout)
        ));
    }
}
