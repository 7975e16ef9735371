//! errata-gateway - Operation dispatcher for the advisory query gateway
//!
//! Implements the transport-independent call surface: a closed
//! registry of four named operations, argument validation that runs
//! before any backend call, and the uniform outcome envelope both
//! transport bindings encode onto their wire.

pub mod dispatcher;
pub mod rpc;

pub use dispatcher::{Dispatcher, Operation};
pub use rpc::{DispatchOutcome, RpcRequest, RpcResponse};
