//! Mock extractor for testing.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::collector::{ExtractError, Extractor, ExtractorSession, FieldMap};

#[derive(Default, Debug)]
struct MockState {
    /// Fields to return on extract; `None` makes every attempt fail with
    /// `NoData`, mirroring the real portal backend.
    fields: RwLock<Option<FieldMap>>,
    /// If set, the next extract fails with this error (consumed once).
    next_error: RwLock<Option<ExtractError>>,
    /// Simulated extraction latency.
    extract_delay: RwLock<Option<Duration>>,
    /// Whether connect attempts should fail.
    fail_connect: AtomicBool,
    /// Subjects passed to extract, in order.
    subjects: RwLock<Vec<String>>,
    connect_count: AtomicUsize,
    extract_count: AtomicUsize,
    close_count: AtomicUsize,
}

/// Mock implementation of the [`Extractor`] pair of traits.
///
/// Provides controllable behavior for testing:
/// - Return a configurable field map, or fail every attempt (the default)
/// - Inject one-shot errors, connect failures, and extraction delays
/// - Count connects, extracts and closes for assertions
///
/// Sessions handed out by `connect` share the mock's state, so counters keep
/// working across reconnects.
pub struct MockExtractor {
    state: Arc<MockState>,
}

impl Default for MockExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExtractor {
    /// Create a mock whose extraction attempts all fail with `NoData`.
    pub fn new() -> Self {
        Self {
            state: Arc::new(MockState::default()),
        }
    }

    /// Create a mock that returns the given fields on every extract.
    pub fn with_fields(fields: FieldMap) -> Self {
        let mock = Self::new();
        *mock.state.fields.blocking_write() = Some(fields);
        mock
    }

    /// Set the fields returned by subsequent extracts.
    pub async fn set_fields(&self, fields: FieldMap) {
        *self.state.fields.write().await = Some(fields);
    }

    /// Make subsequent extracts fail with `NoData` again.
    pub async fn clear_fields(&self) {
        *self.state.fields.write().await = None;
    }

    /// Configure the next extract to fail with the given error.
    pub async fn set_next_error(&self, error: ExtractError) {
        *self.state.next_error.write().await = Some(error);
    }

    /// Simulate slow extraction.
    pub async fn set_extract_delay(&self, delay: Duration) {
        *self.state.extract_delay.write().await = Some(delay);
    }

    /// Make connect attempts fail.
    pub fn set_fail_connect(&self, fail: bool) {
        self.state.fail_connect.store(fail, Ordering::SeqCst);
    }

    /// Number of connect attempts so far.
    pub fn connect_count(&self) -> usize {
        self.state.connect_count.load(Ordering::SeqCst)
    }

    /// Number of extraction attempts so far.
    pub fn extract_count(&self) -> usize {
        self.state.extract_count.load(Ordering::SeqCst)
    }

    /// Number of session closes so far.
    pub fn close_count(&self) -> usize {
        self.state.close_count.load(Ordering::SeqCst)
    }

    /// Subjects passed to extract, in order.
    pub async fn recorded_subjects(&self) -> Vec<String> {
        self.state.subjects.read().await.clone()
    }
}

#[async_trait]
impl Extractor for MockExtractor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn connect(&self) -> Result<Box<dyn ExtractorSession>, ExtractError> {
        self.state.connect_count.fetch_add(1, Ordering::SeqCst);

        if self.state.fail_connect.load(Ordering::SeqCst) {
            return Err(ExtractError::ConnectionFailed(
                "mock connect failure".to_string(),
            ));
        }

        Ok(Box::new(MockSession {
            state: Arc::clone(&self.state),
        }))
    }
}

#[derive(Debug)]
struct MockSession {
    state: Arc<MockState>,
}

#[async_trait]
impl ExtractorSession for MockSession {
    async fn extract(&mut self, subject: &str) -> Result<FieldMap, ExtractError> {
        self.state.extract_count.fetch_add(1, Ordering::SeqCst);
        self.state.subjects.write().await.push(subject.to_string());

        if let Some(delay) = *self.state.extract_delay.read().await {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = self.state.next_error.write().await.take() {
            return Err(error);
        }

        match self.state.fields.read().await.clone() {
            Some(fields) => Ok(fields),
            None => Err(ExtractError::NoData(subject.to_string())),
        }
    }

    async fn close(&mut self) {
        self.state.close_count.fetch_add(1, Ordering::SeqCst);
    }
}
