//! HTTP middleware.

use axum::{extract::Request, middleware::Next, response::Response};
use tokio::time::Instant;

use crate::metrics::{
    normalize_path, HTTP_REQUESTS_IN_FLIGHT, HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION,
};

/// Track request counts, latency and in-flight gauge per route.
pub async fn track_metrics(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = normalize_path(request.uri().path());
    let started = Instant::now();

    HTTP_REQUESTS_IN_FLIGHT.inc();
    let response = next.run(request).await;
    HTTP_REQUESTS_IN_FLIGHT.dec();

    let status = response.status().as_u16().to_string();
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method.as_str(), &path, &status])
        .inc();
    HTTP_REQUEST_DURATION
        .with_label_values(&[method.as_str(), &path, &status])
        .observe(started.elapsed().as_secs_f64());

    response
}
