//! Credential session over externally-managed ticket material
//!
//! Ticket acquisition and renewal are operator actions that happen
//! outside this process. The session only observes the current
//! {principal, expiry} pair and reports whether a usable ticket
//! exists. It never caches validity: every check re-reads the store,
//! so an out-of-band renewal is picked up without a restart.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use serde::Deserialize;
use tracing::debug;

use errata_core::{GatewayError, GatewayResult, Ticket};

/// Read-only accessor for externally-managed credential material
pub trait TicketStore: Send + Sync {
    /// The current ticket, or `None` if no credential material exists
    fn current(&self) -> Option<Ticket>;
}

/// Ticket file format written by operator tooling
#[derive(Debug, Deserialize)]
struct TicketFile {
    principal: String,
    expiry: chrono::DateTime<Utc>,
}

/// Ticket store backed by a JSON file (`{"principal": ..., "expiry": ...}`).
///
/// The file is re-read on every call; an unreadable or malformed file
/// is treated the same as an absent ticket.
pub struct FileTicketStore {
    path: PathBuf,
}

impl FileTicketStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl TicketStore for FileTicketStore {
    fn current(&self) -> Option<Ticket> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "Ticket file not readable");
                return None;
            }
        };

        match serde_json::from_str::<TicketFile>(&content) {
            Ok(file) => Some(Ticket {
                principal: file.principal,
                expiry: file.expiry,
            }),
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "Ticket file malformed");
                None
            }
        }
    }
}

/// In-memory ticket store for tests and fixed-credential deployments
#[derive(Default)]
pub struct StaticTicketStore {
    ticket: RwLock<Option<Ticket>>,
}

impl StaticTicketStore {
    pub fn new(ticket: Option<Ticket>) -> Self {
        Self {
            ticket: RwLock::new(ticket),
        }
    }

    /// Replace the stored ticket (simulates an out-of-band renewal)
    pub fn set(&self, ticket: Option<Ticket>) {
        *self.ticket.write() = ticket;
    }
}

impl TicketStore for StaticTicketStore {
    fn current(&self) -> Option<Ticket> {
        self.ticket.read().clone()
    }
}

/// Validity view over a [`TicketStore`].
///
/// Shared by reference into the backend client; cheap to clone.
#[derive(Clone)]
pub struct CredentialSession {
    store: Arc<dyn TicketStore>,
}

impl CredentialSession {
    pub fn new(store: Arc<dyn TicketStore>) -> Self {
        Self { store }
    }

    /// Whether a usable ticket currently exists
    pub fn is_valid(&self) -> bool {
        self.store
            .current()
            .map(|t| t.valid_at(Utc::now()))
            .unwrap_or(false)
    }

    /// Return the current ticket, or `AuthRequired` if it is absent
    /// or expired. Called by the backend client before every
    /// authenticated request; an invalid session never reaches the
    /// network.
    pub fn ensure_valid(&self) -> GatewayResult<Ticket> {
        match self.store.current() {
            Some(ticket) if ticket.valid_at(Utc::now()) => Ok(ticket),
            Some(ticket) => Err(GatewayError::AuthRequired(format!(
                "ticket for {} expired at {}",
                ticket.principal, ticket.expiry
            ))),
            None => Err(GatewayError::AuthRequired("no ticket available".to_string())),
        }
    }
}
