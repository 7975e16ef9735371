//! Data model for products, advisory states, and advisories
//!
//! All of these are read-only views sourced fresh from the backend on
//! each query; nothing here is cached or persisted by the gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of advisories a single list query may return.
///
/// Caller-supplied limits above this are clamped, never rejected, so
/// the policy is deterministic (see `AdvisoryFilter::clamped`).
pub const MAX_ADVISORY_LIMIT: u32 = 100;

/// A product tracked by the Errata Tool (e.g. RHEL, RHCEPH)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Short name used in queries (e.g. "RHEL")
    pub short_name: String,
    /// Full display name
    pub name: String,
}

/// A lifecycle state an advisory can be in (e.g. QE, SHIPPED_LIVE)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryState {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Filter for an advisory list query, constructed per-call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub limit: u32,
}

impl AdvisoryFilter {
    /// Return a copy with `limit` clamped to [`MAX_ADVISORY_LIMIT`].
    ///
    /// A zero limit is a caller error and must be rejected before this
    /// point; clamping only bounds the upper end.
    pub fn clamped(&self) -> Self {
        Self {
            product: self.product.clone(),
            state: self.state.clone(),
            limit: self.limit.min(MAX_ADVISORY_LIMIT),
        }
    }
}

impl Default for AdvisoryFilter {
    fn default() -> Self {
        Self {
            product: None,
            state: None,
            limit: 50,
        }
    }
}

/// One element of an advisory list query result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorySummary {
    /// Advisory name, e.g. "RHSA-2024:1234"
    pub id: String,
    pub synopsis: String,
    pub state: String,
    pub product: String,
}

/// Full advisory record as released by the backend.
///
/// Field set follows what the Errata Tool exposes for a single
/// erratum; optional fields are omitted from the wire when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryDetail {
    /// Advisory name, e.g. "RHSA-2024:1234"
    pub id: String,
    /// Numeric erratum id, e.g. 148894
    pub numeric_id: u64,
    pub synopsis: String,
    pub state: String,
    pub product: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Advisory type: RHSA, RHBA, or RHEA
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub embargoed: bool,
    pub text_only: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content_types: Vec<String>,
    /// Security impact for RHSA advisories (Low/Moderate/Important/Critical)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_impact: Option<String>,
}

/// A time-limited authentication ticket, acquired out-of-band.
///
/// The gateway never creates or renews tickets; it only observes the
/// {principal, expiry} pair the execution environment provides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Authenticated principal, e.g. "jdoe@EXAMPLE.COM"
    pub principal: String,
    /// Absolute expiry time of the ticket
    pub expiry: DateTime<Utc>,
}

impl Ticket {
    /// Whether the ticket is still usable at time `now`
    pub fn valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn filter_clamps_upper_bound_only() {
        let filter = AdvisoryFilter {
            product: Some("RHEL".into()),
            state: None,
            limit: 5000,
        };
        let clamped = filter.clamped();
        assert_eq!(clamped.limit, MAX_ADVISORY_LIMIT);
        assert_eq!(clamped.product.as_deref(), Some("RHEL"));

        let small = AdvisoryFilter {
            limit: 10,
            ..Default::default()
        };
        assert_eq!(small.clamped().limit, 10);
    }

    #[test]
    fn ticket_validity_is_strict() {
        let now = Utc::now();
        let live = Ticket {
            principal: "jdoe@EXAMPLE.COM".into(),
            expiry: now + Duration::hours(8),
        };
        assert!(live.valid_at(now));

        let expired = Ticket {
            principal: "jdoe@EXAMPLE.COM".into(),
            expiry: now,
        };
        // Expiry exactly at "now" counts as expired.
        assert!(!expired.valid_at(now));
    }
}
