//! Integration tests for the advisory gateway
//!
//! This crate contains end-to-end tests that exercise the full stack:
//! - the SSE streaming binding (sessions, liveness, concurrency)
//! - the backend HTTP client against a stub Errata API
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p errata-tests
//! ```
//!
//! # Test Structure
//!
//! - `sse_transport_test.rs` - streaming binding with a mock backend
//! - `client_classification_test.rs` - HTTP client against a stub server

// This crate only contains tests, no library code
