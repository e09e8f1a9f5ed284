//! Trade collector handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use tradegate_core::{CollectError, Record};

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TradeFetchRequest {
    /// Subjects to fetch, in order.
    pub subjects: Vec<String>,
    /// Optional per-request overrides of the configured defaults.
    #[serde(default)]
    pub ttl_ms: Option<u64>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub min_delay_ms: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct TradeFetchResponse {
    /// One record per subject, in request order. Degradation shows up only
    /// in each record's provenance.
    pub records: Vec<Record>,
    pub duration_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct CacheStatsResponse {
    pub entries: usize,
}

#[derive(Debug, Serialize)]
pub struct InvalidateResponse {
    pub removed: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/trade/fetch
///
/// Fetch trade records for a batch of subjects.
pub async fn fetch_batch(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TradeFetchRequest>,
) -> Result<Json<TradeFetchResponse>, (StatusCode, Json<ErrorResponse>)> {
    let mut config = state.fetch_defaults().clone();
    if let Some(ttl_ms) = body.ttl_ms {
        config.ttl_ms = ttl_ms;
    }
    if let Some(timeout_ms) = body.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    if let Some(min_delay_ms) = body.min_delay_ms {
        config.min_delay_ms = min_delay_ms;
    }

    let started = Instant::now();
    match state.collector().fetch_batch(&body.subjects, &config).await {
        Ok(records) => Ok(Json(TradeFetchResponse {
            records,
            duration_ms: started.elapsed().as_millis() as u64,
        })),
        Err(e @ CollectError::InvalidKey(_)) => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}

/// GET /api/v1/trade/cache
pub async fn cache_stats(State(state): State<Arc<AppState>>) -> Json<CacheStatsResponse> {
    Json(CacheStatsResponse {
        entries: state.collector().cache_len().await,
    })
}

/// DELETE /api/v1/trade/cache
pub async fn clear_cache(State(state): State<Arc<AppState>>) -> StatusCode {
    state.collector().clear_cache().await;
    StatusCode::NO_CONTENT
}

/// DELETE /api/v1/trade/cache/{subject}
pub async fn invalidate(
    State(state): State<Arc<AppState>>,
    Path(subject): Path<String>,
) -> Json<InvalidateResponse> {
    Json(InvalidateResponse {
        removed: state.collector().invalidate(&subject).await,
    })
}
