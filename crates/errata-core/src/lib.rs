//! errata-core - Core traits and types for the advisory query gateway
//!
//! This crate provides the abstractions shared by the operation
//! dispatcher, the backend HTTP client, and both transport bindings:
//! the data model for products/states/advisories, the uniform error
//! taxonomy, and the `AdvisoryBackend` trait.

pub mod backend;
pub mod error;
pub mod models;

pub use backend::AdvisoryBackend;
pub use error::{GatewayError, GatewayResult};
pub use models::{
    AdvisoryDetail, AdvisoryFilter, AdvisoryState, AdvisorySummary, Product, Ticket,
    MAX_ADVISORY_LIMIT,
};
