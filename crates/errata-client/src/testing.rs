//! Test utilities shared across the workspace
//!
//! Provides a scripted [`MockAdvisoryBackend`] with call counters and
//! an in-process [`TestServer`] for running axum routers on port 0.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::net::TcpListener;

use errata_core::{
    AdvisoryBackend, AdvisoryDetail, AdvisoryFilter, AdvisoryState, AdvisorySummary, GatewayError,
    GatewayResult, Product,
};

/// Scripted backend for dispatcher and transport tests.
///
/// Each operation returns the configured result and bumps a counter,
/// so tests can assert that rejected arguments never reach the
/// backend. An optional per-call delay supports concurrency tests.
pub struct MockAdvisoryBackend {
    products: RwLock<GatewayResult<Vec<Product>>>,
    states: RwLock<GatewayResult<Vec<AdvisoryState>>>,
    advisories: RwLock<GatewayResult<Vec<AdvisorySummary>>>,
    detail: RwLock<GatewayResult<AdvisoryDetail>>,
    delay: RwLock<Option<Duration>>,
    product_calls: AtomicUsize,
    state_calls: AtomicUsize,
    advisory_calls: AtomicUsize,
    detail_calls: AtomicUsize,
    /// Filter seen by the most recent list_advisories call
    last_filter: RwLock<Option<AdvisoryFilter>>,
}

impl Default for MockAdvisoryBackend {
    fn default() -> Self {
        Self {
            products: RwLock::new(Ok(Vec::new())),
            states: RwLock::new(Ok(Vec::new())),
            advisories: RwLock::new(Ok(Vec::new())),
            detail: RwLock::new(Err(GatewayError::NotFound("no detail scripted".into()))),
            delay: RwLock::new(None),
            product_calls: AtomicUsize::new(0),
            state_calls: AtomicUsize::new(0),
            advisory_calls: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
            last_filter: RwLock::new(None),
        }
    }
}

impl MockAdvisoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_products(&self, result: GatewayResult<Vec<Product>>) {
        *self.products.write() = result;
    }

    pub fn set_states(&self, result: GatewayResult<Vec<AdvisoryState>>) {
        *self.states.write() = result;
    }

    pub fn set_advisories(&self, result: GatewayResult<Vec<AdvisorySummary>>) {
        *self.advisories.write() = result;
    }

    pub fn set_detail(&self, result: GatewayResult<AdvisoryDetail>) {
        *self.detail.write() = result;
    }

    /// Delay applied inside every call; lets tests hold calls in
    /// flight while a caller disconnects.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.write() = Some(delay);
    }

    pub fn product_calls(&self) -> usize {
        self.product_calls.load(Ordering::SeqCst)
    }

    pub fn state_calls(&self) -> usize {
        self.state_calls.load(Ordering::SeqCst)
    }

    pub fn advisory_calls(&self) -> usize {
        self.advisory_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.product_calls() + self.state_calls() + self.advisory_calls() + self.detail_calls()
    }

    pub fn last_filter(&self) -> Option<AdvisoryFilter> {
        self.last_filter.read().clone()
    }

    async fn pause(&self) {
        let delay = *self.delay.read();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl AdvisoryBackend for MockAdvisoryBackend {
    async fn list_products(&self) -> GatewayResult<Vec<Product>> {
        self.product_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.products.read().clone()
    }

    async fn list_states(&self) -> GatewayResult<Vec<AdvisoryState>> {
        self.state_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.states.read().clone()
    }

    async fn list_advisories(
        &self,
        filter: &AdvisoryFilter,
    ) -> GatewayResult<Vec<AdvisorySummary>> {
        self.advisory_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_filter.write() = Some(filter.clone());
        self.pause().await;
        self.advisories.read().clone()
    }

    async fn advisory_detail(&self, _advisory_id: u64) -> GatewayResult<AdvisoryDetail> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.detail.read().clone()
    }
}

/// Sample advisory summaries used across tests
pub fn sample_summaries() -> Vec<AdvisorySummary> {
    vec![
        AdvisorySummary {
            id: "RHSA-2024:1234".into(),
            synopsis: "Important: kernel security update".into(),
            state: "QE".into(),
            product: "RHEL".into(),
        },
        AdvisorySummary {
            id: "RHBA-2024:5678".into(),
            synopsis: "openssl bug fix update".into(),
            state: "QE".into(),
            product: "RHEL".into(),
        },
    ]
}

/// Sample advisory detail used across tests
pub fn sample_detail() -> AdvisoryDetail {
    AdvisoryDetail {
        id: "RHSA-2024:1234".into(),
        numeric_id: 148894,
        synopsis: "Important: kernel security update".into(),
        state: "QE".into(),
        product: "RHEL".into(),
        description: Some("An update for kernel is now available.".into()),
        advisory_type: Some("RHSA".into()),
        release: Some("RHEL-9.4.0".into()),
        created_date: None,
        updated_date: None,
        url: Some("https://errata.example.com/advisory/148894".into()),
        embargoed: false,
        text_only: false,
        content_types: vec!["rpm".into()],
        security_impact: Some("Important".into()),
    }
}

/// A test server that shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Bind an axum router on an ephemeral port and serve it
    pub async fn start(router: axum::Router) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Shut the server down.
    ///
    /// Signals graceful shutdown, then aborts the serve task so
    /// long-lived connections (open SSE streams) cannot keep the
    /// server alive indefinitely.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
