//! RPC envelope shared by the streaming and pipe bindings
//!
//! Transports parse an [`RpcRequest`] off their wire, hand it to the
//! dispatcher, and encode the resulting [`RpcResponse`] back out. The
//! outcome shape is the same on both transports.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use errata_core::GatewayError;

/// One inbound call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    /// Caller-chosen correlation id, echoed back unchanged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Operation name, e.g. "list_products"
    pub op: String,
    /// Operation arguments; defaults to null for argument-free calls
    #[serde(default)]
    pub args: Value,
}

/// One outbound result, correlated to its request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(flatten)]
    pub outcome: DispatchOutcome,
}

/// Uniform call outcome.
///
/// Mirrors the backend-agnostic contract: success carries the payload,
/// errors carry a stable code plus a human-readable message built from
/// the per-kind template. Transports never add outcome kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DispatchOutcome {
    Success { data: Value, message: String },
    Error { code: String, message: String },
}

impl DispatchOutcome {
    /// Success outcome with a serialized payload
    pub fn success(data: Value, message: impl Into<String>) -> Self {
        DispatchOutcome::Success {
            data,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::Success { .. })
    }

    /// Error code if this outcome is an error
    pub fn error_code(&self) -> Option<&str> {
        match self {
            DispatchOutcome::Success { .. } => None,
            DispatchOutcome::Error { code, .. } => Some(code),
        }
    }
}

impl From<GatewayError> for DispatchOutcome {
    fn from(err: GatewayError) -> Self {
        let detail = err.detail();
        let message = if detail.is_empty() {
            err.caller_hint().to_string()
        } else {
            format!("{} ({})", err.caller_hint(), detail)
        };
        DispatchOutcome::Error {
            code: err.code().to_string(),
            message,
        }
    }
}
