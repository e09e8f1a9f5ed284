//! Test doubles and fixtures.
//!
//! Compiled into the library so integration tests and the server's test
//! suite can drive the collector without a live portal.

pub mod fixtures;
mod mock_extractor;

pub use mock_extractor::MockExtractor;
