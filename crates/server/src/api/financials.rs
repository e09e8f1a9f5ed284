//! Disclosure proxy handlers.
//!
//! These endpoints forward to the external disclosure REST API and hand the
//! upstream body back verbatim; only query parameters are validated here.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tradegate_core::{DisclosureError, FinancialQuery, ReportCode, REPORT_CODES};

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct FinancialsRequest {
    pub corp_code: String,
    pub bsns_year: String,
    pub reprt_code: String,
}

#[derive(Debug, Serialize)]
pub struct FinancialsResponse {
    /// Raw XML from the disclosure API, forwarded verbatim.
    pub data: String,
    pub params: FinancialQuery,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ReportCodesResponse {
    pub report_codes: &'static [ReportCode],
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/report-codes
///
/// The static table of report types the disclosure API accepts.
pub async fn list_report_codes() -> Json<ReportCodesResponse> {
    Json(ReportCodesResponse {
        report_codes: &REPORT_CODES,
    })
}

/// GET /api/v1/companies
///
/// Proxy the company registry index; the upstream bytes pass through as-is.
pub async fn company_index(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let Some(client) = state.disclosure() else {
        return Err(not_configured());
    };

    match client.fetch_company_index().await {
        Ok(bytes) => Ok((
            [(header::CONTENT_TYPE, "application/octet-stream")],
            bytes,
        )),
        Err(e) => Err(error_response(e)),
    }
}

/// POST /api/v1/financials
///
/// Look up periodic-report financials for one company and fiscal year.
pub async fn fetch_financials(
    State(state): State<Arc<AppState>>,
    Json(body): Json<FinancialsRequest>,
) -> Result<Json<FinancialsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let Some(client) = state.disclosure() else {
        return Err(not_configured());
    };

    let query = FinancialQuery {
        corp_code: body.corp_code,
        bsns_year: body.bsns_year,
        reprt_code: body.reprt_code,
    };

    match client.fetch_financials(&query).await {
        Ok(data) => Ok(Json(FinancialsResponse {
            data,
            params: query,
            timestamp: Utc::now(),
        })),
        Err(e) => Err(error_response(e)),
    }
}

fn not_configured() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ErrorResponse {
            error: "Disclosure API not configured".to_string(),
        }),
    )
}

fn error_response(error: DisclosureError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &error {
        DisclosureError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
        DisclosureError::Http(_) | DisclosureError::ApiError { .. } => StatusCode::BAD_GATEWAY,
    };
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}
