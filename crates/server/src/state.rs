use std::sync::Arc;

use tradegate_core::{
    CollectorConfig, Config, DisclosureClient, FetchOrchestrator, SanitizedConfig,
};

/// Shared application state
pub struct AppState {
    config: Config,
    disclosure: Option<Arc<DisclosureClient>>,
    collector: Arc<FetchOrchestrator>,
}

impl AppState {
    pub fn new(
        config: Config,
        disclosure: Option<Arc<DisclosureClient>>,
        collector: Arc<FetchOrchestrator>,
    ) -> Self {
        Self {
            config,
            disclosure,
            collector,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    /// The disclosure client, when an API key is configured.
    pub fn disclosure(&self) -> Option<&DisclosureClient> {
        self.disclosure.as_deref()
    }

    pub fn collector(&self) -> &FetchOrchestrator {
        &self.collector
    }

    /// Configured per-fetch defaults, overridable per request.
    pub fn fetch_defaults(&self) -> &CollectorConfig {
        &self.config.collector.fetch
    }
}
