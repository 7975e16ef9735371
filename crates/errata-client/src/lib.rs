//! Errata Tool client library
//!
//! Provides the production [`AdvisoryBackend`](errata_core::AdvisoryBackend)
//! implementation: a typed HTTP client against the Errata Tool API plus
//! the credential session that gates authenticated calls.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use errata_client::{CredentialSession, ErrataClient, FileTicketStore};
//! use errata_core::{AdvisoryBackend, GatewayResult};
//!
//! #[tokio::main]
//! async fn main() -> GatewayResult<()> {
//!     let store = Arc::new(FileTicketStore::new("/run/errata/ticket.json"));
//!     let session = CredentialSession::new(store);
//!     let client = ErrataClient::new("https://errata.example.com", session)?;
//!
//!     let products = client.list_products().await?;
//!     println!("{} products", products.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod session;
pub mod testing;

pub use client::ErrataClient;
pub use session::{CredentialSession, FileTicketStore, StaticTicketStore, TicketStore};
