//! AdvisoryBackend trait - the seam between dispatcher and backend client
//!
//! The operation dispatcher holds an `Arc<dyn AdvisoryBackend>` and
//! never sees HTTP. The production implementation lives in
//! errata-client; tests substitute a scripted mock.

use async_trait::async_trait;

use crate::error::GatewayResult;
use crate::models::{AdvisoryDetail, AdvisoryFilter, AdvisoryState, AdvisorySummary, Product};

/// Read-only query surface of the external advisory system.
///
/// Implementations classify every backend failure into the
/// [`GatewayError`](crate::GatewayError) taxonomy; callers never see
/// transport-specific error shapes.
#[async_trait]
pub trait AdvisoryBackend: Send + Sync {
    /// List available products
    async fn list_products(&self) -> GatewayResult<Vec<Product>>;

    /// List possible advisory lifecycle states
    async fn list_states(&self) -> GatewayResult<Vec<AdvisoryState>>;

    /// List advisories matching the filter, in backend-provided order.
    ///
    /// Implementations must clamp `filter.limit` to
    /// [`MAX_ADVISORY_LIMIT`](crate::MAX_ADVISORY_LIMIT).
    async fn list_advisories(&self, filter: &AdvisoryFilter)
        -> GatewayResult<Vec<AdvisorySummary>>;

    /// Fetch the full record for one advisory.
    ///
    /// Requires a valid credential session; implementations verify it
    /// before issuing any network call.
    async fn advisory_detail(&self, advisory_id: u64) -> GatewayResult<AdvisoryDetail>;
}
