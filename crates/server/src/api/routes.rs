use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{financials, handlers, middleware, trade};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health, config and metrics
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::get_metrics))
        // Disclosure proxy
        .route("/report-codes", get(financials::list_report_codes))
        .route("/companies", get(financials::company_index))
        .route("/financials", post(financials::fetch_financials))
        // Trade collector
        .route("/trade/fetch", post(trade::fetch_batch))
        .route("/trade/cache", get(trade::cache_stats))
        .route("/trade/cache", delete(trade::clear_cache))
        .route("/trade/cache/{subject}", delete(trade::invalidate))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(axum_middleware::from_fn(middleware::track_metrics))
        .layer(TraceLayer::new_for_http())
        // The browser UI is served from a different origin.
        .layer(CorsLayer::permissive())
}
