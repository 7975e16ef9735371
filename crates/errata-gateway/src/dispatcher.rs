//! Operation dispatcher - fixed registry of named query operations
//!
//! Dispatch is a closed mapping from operation name to handler; an
//! unknown name is a caller error, never a crash. Argument validation
//! happens before any backend call so malformed input cannot burn an
//! authenticated request.

use std::str::FromStr;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use errata_core::{
    AdvisoryBackend, AdvisoryFilter, GatewayError, GatewayResult, MAX_ADVISORY_LIMIT,
};

use crate::rpc::{DispatchOutcome, RpcRequest, RpcResponse};

/// The closed set of callable operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListProducts,
    ListStates,
    ListAdvisories,
    GetAdvisoryInfo,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::ListProducts,
        Operation::ListStates,
        Operation::ListAdvisories,
        Operation::GetAdvisoryInfo,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Operation::ListProducts => "list_products",
            Operation::ListStates => "list_states",
            Operation::ListAdvisories => "list_advisories",
            Operation::GetAdvisoryInfo => "get_advisory_info",
        }
    }
}

impl FromStr for Operation {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "list_products" => Ok(Operation::ListProducts),
            "list_states" => Ok(Operation::ListStates),
            "list_advisories" => Ok(Operation::ListAdvisories),
            "get_advisory_info" => Ok(Operation::GetAdvisoryInfo),
            other => {
                let known = Operation::ALL
                    .iter()
                    .map(|op| op.name())
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(GatewayError::InvalidArgument(format!(
                    "unknown operation '{other}'; expected one of: {known}"
                )))
            }
        }
    }
}

/// Arguments for `list_advisories`
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListAdvisoriesArgs {
    #[serde(default)]
    product: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default = "default_limit")]
    limit: u32,
}

fn default_limit() -> u32 {
    50
}

/// Arguments for `get_advisory_info`
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AdvisoryInfoArgs {
    advisory_id: String,
}

/// Transport-independent call surface.
///
/// Stateless between calls apart from the shared backend (and its
/// credential session) held by reference.
#[derive(Clone)]
pub struct Dispatcher {
    backend: Arc<dyn AdvisoryBackend>,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn AdvisoryBackend>) -> Self {
        Self { backend }
    }

    /// Dispatch a full request envelope, echoing the correlation id
    pub async fn handle_request(&self, request: RpcRequest) -> RpcResponse {
        let outcome = self.dispatch(&request.op, request.args).await;
        RpcResponse {
            id: request.id,
            outcome,
        }
    }

    /// Dispatch one named operation with caller-supplied arguments
    pub async fn dispatch(&self, op: &str, args: Value) -> DispatchOutcome {
        debug!(op, "Dispatching operation");
        match self.run(op, args).await {
            Ok(outcome) => outcome,
            Err(err) => err.into(),
        }
    }

    async fn run(&self, op: &str, args: Value) -> GatewayResult<DispatchOutcome> {
        let operation = Operation::from_str(op)?;
        match operation {
            Operation::ListProducts => {
                require_no_args(operation, &args)?;
                let products = self.backend.list_products().await?;
                let message = format!("Retrieved {} products", products.len());
                success(&products, message)
            }
            Operation::ListStates => {
                require_no_args(operation, &args)?;
                let states = self.backend.list_states().await?;
                let message = format!("Retrieved {} advisory states", states.len());
                success(&states, message)
            }
            Operation::ListAdvisories => {
                let args: ListAdvisoriesArgs = parse_args(operation, args)?;
                if args.limit == 0 {
                    return Err(GatewayError::InvalidArgument(
                        "limit must be a positive integer".to_string(),
                    ));
                }
                // Clamp policy: over-limit requests are bounded, not
                // rejected, and the clamp happens before the backend
                // sees the filter.
                let filter = AdvisoryFilter {
                    product: args.product,
                    state: args.state,
                    limit: args.limit.min(MAX_ADVISORY_LIMIT),
                };
                let advisories = self.backend.list_advisories(&filter).await?;
                let message = format!("Retrieved {} advisories", advisories.len());
                success(&advisories, message)
            }
            Operation::GetAdvisoryInfo => {
                let args: AdvisoryInfoArgs = parse_args(operation, args)?;
                let advisory_id = parse_advisory_id(&args.advisory_id)?;
                let detail = self.backend.advisory_detail(advisory_id).await?;
                let message = format!("Retrieved information for advisory {advisory_id}");
                success(&detail, message)
            }
        }
    }
}

/// Reject arguments for argument-free operations.
///
/// Null and `{}` both count as "no arguments" so callers on either
/// transport can omit the field or send an empty object.
fn require_no_args(op: Operation, args: &Value) -> GatewayResult<()> {
    let empty = match args {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    };
    if empty {
        Ok(())
    } else {
        Err(GatewayError::InvalidArgument(format!(
            "{} takes no arguments",
            op.name()
        )))
    }
}

fn parse_args<T: DeserializeOwned>(op: Operation, args: Value) -> GatewayResult<T> {
    // Treat a missing args field as an empty object so operations
    // with all-optional arguments still dispatch.
    let args = match args {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(args).map_err(|e| {
        GatewayError::InvalidArgument(format!("invalid arguments for {}: {e}", op.name()))
    })
}

/// The backend identifies advisories by numeric erratum id
fn parse_advisory_id(raw: &str) -> GatewayResult<u64> {
    if raw.is_empty() {
        return Err(GatewayError::InvalidArgument(
            "advisory_id is required".to_string(),
        ));
    }
    raw.parse::<u64>().map_err(|_| {
        GatewayError::InvalidArgument(format!(
            "numeric advisory id required (e.g. 148894), got '{raw}'"
        ))
    })
}

fn success<T: Serialize>(payload: &T, message: String) -> GatewayResult<DispatchOutcome> {
    let data = serde_json::to_value(payload)
        .map_err(|e| GatewayError::Internal(format!("unserializable payload: {e}")))?;
    Ok(DispatchOutcome::success(data, message))
}
