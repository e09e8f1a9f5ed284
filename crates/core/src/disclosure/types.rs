//! Types for the financial disclosure API.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static CORP_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{8}$").unwrap());
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}$").unwrap());

/// Parameters for a periodic-report financials lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialQuery {
    /// Eight-digit registry code of the company.
    pub corp_code: String,
    /// Four-digit fiscal year.
    pub bsns_year: String,
    /// Report type code, one of [`REPORT_CODES`].
    pub reprt_code: String,
}

impl FinancialQuery {
    /// Fail-fast validation of all three parameters.
    pub fn validate(&self) -> Result<(), DisclosureError> {
        if !CORP_CODE_RE.is_match(&self.corp_code) {
            return Err(DisclosureError::InvalidQuery(format!(
                "corp_code must be 8 digits, got {:?}",
                self.corp_code
            )));
        }
        if !YEAR_RE.is_match(&self.bsns_year) {
            return Err(DisclosureError::InvalidQuery(format!(
                "bsns_year must be 4 digits, got {:?}",
                self.bsns_year
            )));
        }
        if report_code_name(&self.reprt_code).is_none() {
            return Err(DisclosureError::InvalidQuery(format!(
                "unknown reprt_code {:?}",
                self.reprt_code
            )));
        }
        Ok(())
    }
}

/// A periodic report type recognized by the disclosure API.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReportCode {
    pub code: &'static str,
    pub name: &'static str,
}

/// The report types the disclosure API accepts.
pub const REPORT_CODES: [ReportCode; 5] = [
    ReportCode { code: "11011", name: "annual report" },
    ReportCode { code: "11014", name: "first quarter report" },
    ReportCode { code: "11013", name: "half-year report" },
    ReportCode { code: "11012", name: "third quarter report" },
    ReportCode { code: "11015", name: "quarterly report" },
];

/// Look up the display name for a report code.
pub fn report_code_name(code: &str) -> Option<&'static str> {
    REPORT_CODES
        .iter()
        .find(|entry| entry.code == code)
        .map(|entry| entry.name)
}

/// Errors from the disclosure API client.
#[derive(Debug, Error)]
pub enum DisclosureError {
    /// Bad query parameters; rejected before any request is made.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("disclosure API error: {status} - {message}")]
    ApiError { status: u16, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(corp_code: &str, year: &str, report: &str) -> FinancialQuery {
        FinancialQuery {
            corp_code: corp_code.to_string(),
            bsns_year: year.to_string(),
            reprt_code: report.to_string(),
        }
    }

    #[test]
    fn test_valid_query() {
        assert!(query("00126380", "2023", "11011").validate().is_ok());
    }

    #[test]
    fn test_invalid_corp_code() {
        for bad in ["", "1234567", "123456789", "1234abcd"] {
            let err = query(bad, "2023", "11011").validate().unwrap_err();
            assert!(matches!(err, DisclosureError::InvalidQuery(_)), "{:?}", bad);
        }
    }

    #[test]
    fn test_invalid_year() {
        for bad in ["", "23", "20233", "yr23"] {
            let err = query("00126380", bad, "11011").validate().unwrap_err();
            assert!(matches!(err, DisclosureError::InvalidQuery(_)), "{:?}", bad);
        }
    }

    #[test]
    fn test_invalid_report_code() {
        let err = query("00126380", "2023", "99999").validate().unwrap_err();
        assert!(matches!(err, DisclosureError::InvalidQuery(_)));
    }

    #[test]
    fn test_report_code_lookup() {
        assert_eq!(report_code_name("11011"), Some("annual report"));
        assert_eq!(report_code_name("11013"), Some("half-year report"));
        assert_eq!(report_code_name("00000"), None);
    }

    #[test]
    fn test_report_codes_are_unique() {
        let mut codes: Vec<_> = REPORT_CODES.iter().map(|entry| entry.code).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), REPORT_CODES.len());
    }
}
