//! Common error taxonomy for gateway operations
//!
//! Every operation, on every transport, resolves to either a success
//! payload or one of these error kinds. Transports translate the kind
//! into their own encoding and never invent new ones.

use thiserror::Error;

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors that can occur while answering a query
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// No usable credential ticket, or the ticket has expired.
    /// Caller-actionable: refresh credentials and retry.
    #[error("Authentication required: {0}")]
    AuthRequired(String),

    /// Authenticated but not permitted to see the resource
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Valid query, no matching resource in the backend
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller error, rejected before any backend call
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Transient network or backend failure; safe to retry
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Unexpected programming error (registry misconfiguration,
    /// undecodable backend payload). Aborts the current call only.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Stable wire code for this error kind
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::AuthRequired(_) => "auth_required",
            GatewayError::AccessDenied(_) => "access_denied",
            GatewayError::NotFound(_) => "not_found",
            GatewayError::InvalidArgument(_) => "invalid_argument",
            GatewayError::BackendUnavailable(_) => "backend_unavailable",
            GatewayError::Internal(_) => "internal_error",
        }
    }

    /// Stable caller-facing message template for this error kind.
    ///
    /// The detail string is appended by the dispatcher; the template
    /// itself never changes, so callers can rely on it instead of raw
    /// backend error text.
    pub fn caller_hint(&self) -> &'static str {
        match self {
            GatewayError::AuthRequired(_) => {
                "No valid credential session. Refresh your Kerberos ticket and retry."
            }
            GatewayError::AccessDenied(_) => {
                "Your account is not permitted to access this resource."
            }
            GatewayError::NotFound(_) => "No matching resource exists in the Errata Tool.",
            GatewayError::InvalidArgument(_) => "The request arguments were rejected.",
            GatewayError::BackendUnavailable(_) => {
                "The Errata Tool is temporarily unreachable. Retrying is safe."
            }
            GatewayError::Internal(_) => "The gateway hit an unexpected internal error.",
        }
    }

    /// Detail string carried by this error
    pub fn detail(&self) -> &str {
        match self {
            GatewayError::AuthRequired(msg)
            | GatewayError::AccessDenied(msg)
            | GatewayError::NotFound(msg)
            | GatewayError::InvalidArgument(msg)
            | GatewayError::BackendUnavailable(msg)
            | GatewayError::Internal(msg) => msg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(GatewayError::AuthRequired(String::new()).code(), "auth_required");
        assert_eq!(GatewayError::AccessDenied(String::new()).code(), "access_denied");
        assert_eq!(GatewayError::NotFound(String::new()).code(), "not_found");
        assert_eq!(
            GatewayError::InvalidArgument(String::new()).code(),
            "invalid_argument"
        );
        assert_eq!(
            GatewayError::BackendUnavailable(String::new()).code(),
            "backend_unavailable"
        );
        assert_eq!(GatewayError::Internal(String::new()).code(), "internal_error");
    }

    #[test]
    fn auth_hint_tells_caller_to_refresh() {
        let err = GatewayError::AuthRequired("ticket expired".into());
        assert!(err.caller_hint().contains("Refresh"));
        assert_eq!(err.detail(), "ticket expired");
    }
}
