//! Financial disclosure API integration.
//!
//! The gateway forwards financials lookups to the external disclosure REST
//! API verbatim and hands the raw response back; only the query parameters
//! are validated locally.

mod client;
mod types;

pub use client::{DisclosureClient, DisclosureConfig};
pub use types::{report_code_name, DisclosureError, FinancialQuery, ReportCode, REPORT_CODES};
