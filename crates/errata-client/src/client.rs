//! Errata Tool HTTP client implementation
//!
//! Centralizes backend error classification: every HTTP outcome is
//! mapped to the [`GatewayError`] taxonomy here, so the dispatcher and
//! both transports see identical failure semantics regardless of
//! backend quirks.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use errata_core::{
    AdvisoryBackend, AdvisoryDetail, AdvisoryFilter, AdvisoryState, AdvisorySummary, GatewayError,
    GatewayResult, Product,
};

use crate::session::CredentialSession;

/// Default request timeout. Every backend call is bounded; exceeding
/// this yields BackendUnavailable, never an indefinite hang.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default connection timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Typed client for the Errata Tool REST API
#[derive(Clone)]
pub struct ErrataClient {
    client: Client,
    base_url: Url,
    session: CredentialSession,
}

impl ErrataClient {
    /// Create a new client with default timeouts
    pub fn new(base_url: &str, session: CredentialSession) -> GatewayResult<Self> {
        Self::with_config(base_url, session, DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    /// Create a new client with custom timeouts
    pub fn with_config(
        base_url: &str,
        session: CredentialSession,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| GatewayError::Internal(format!("failed to build HTTP client: {e}")))?;

        let base_url = Url::parse(base_url)
            .map_err(|e| GatewayError::InvalidArgument(format!("invalid backend URL: {e}")))?;

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    /// The credential session this client checks before authenticated calls
    pub fn session(&self) -> &CredentialSession {
        &self.session
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> GatewayResult<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| GatewayError::Internal(format!("undecodable backend response: {e}")))
        } else {
            Err(classify_status(status, response).await)
        }
    }

    fn join(&self, path: &str) -> GatewayResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| GatewayError::Internal(format!("bad request path {path}: {e}")))
    }
}

#[async_trait]
impl AdvisoryBackend for ErrataClient {
    #[instrument(skip(self))]
    async fn list_products(&self) -> GatewayResult<Vec<Product>> {
        let url = self.join("/api/v1/products")?;
        debug!("Listing products from {}", url);

        let body: ProductListResponse = self.get_json(url).await?;
        Ok(body
            .data
            .into_iter()
            .map(|p| Product {
                short_name: p.short_name,
                name: p.name,
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn list_states(&self) -> GatewayResult<Vec<AdvisoryState>> {
        let url = self.join("/api/v1/states")?;

        let body: StateListResponse = self.get_json(url).await?;
        Ok(body
            .data
            .into_iter()
            .map(|s| AdvisoryState {
                name: s.name,
                description: s.description,
            })
            .collect())
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit))]
    async fn list_advisories(
        &self,
        filter: &AdvisoryFilter,
    ) -> GatewayResult<Vec<AdvisorySummary>> {
        let filter = filter.clamped();
        let mut url = self.join("/api/v1/errata")?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(ref product) = filter.product {
                query.append_pair("product", product);
            }
            if let Some(ref state) = filter.state {
                query.append_pair("state", state);
            }
            query.append_pair("per_page", &filter.limit.to_string());
        }

        let body: ErratumListResponse = self.get_json(url).await?;
        // Backend-provided order is preserved.
        Ok(body
            .data
            .into_iter()
            .map(|e| AdvisorySummary {
                id: e.errata_name,
                synopsis: e.synopsis,
                state: e.status,
                product: e.product,
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn advisory_detail(&self, advisory_id: u64) -> GatewayResult<AdvisoryDetail> {
        // Authenticated endpoint: an invalid session fails here,
        // before any network call.
        let ticket = self.session.ensure_valid()?;
        debug!(principal = %ticket.principal, advisory_id, "Fetching advisory detail");

        let url = self.join(&format!("/api/v1/erratum/{advisory_id}"))?;
        let body: ErratumDetailResponse = self.get_json(url).await?;

        Ok(AdvisoryDetail {
            id: body.errata_name,
            numeric_id: body.errata_id,
            synopsis: body.synopsis,
            state: body.status,
            product: body.product,
            description: body.description,
            advisory_type: body.errata_type,
            release: body.release,
            created_date: body.issue_date,
            updated_date: body.update_date,
            url: body.url,
            embargoed: body.embargoed,
            text_only: body.text_only,
            content_types: body.content_types,
            security_impact: body.security_impact,
        })
    }
}

/// Map a transport-level reqwest failure to the gateway taxonomy.
///
/// Timeouts and connection failures are transient (caller may retry);
/// anything else at this layer is a programming error.
fn classify_request_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::BackendUnavailable("backend request timed out".to_string())
    } else if err.is_connect() {
        GatewayError::BackendUnavailable(format!("backend connection failed: {err}"))
    } else {
        GatewayError::Internal(format!("backend request failed: {err}"))
    }
}

/// Map a non-success HTTP status to the gateway taxonomy
async fn classify_status(status: StatusCode, response: reqwest::Response) -> GatewayError {
    let message = match response.json::<BackendErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => format!("HTTP {status}"),
    };

    match status {
        StatusCode::UNAUTHORIZED => GatewayError::AuthRequired(message),
        StatusCode::FORBIDDEN => GatewayError::AccessDenied(message),
        StatusCode::NOT_FOUND => GatewayError::NotFound(message),
        StatusCode::BAD_REQUEST => GatewayError::InvalidArgument(message),
        s if s.is_server_error() => GatewayError::BackendUnavailable(message),
        s => GatewayError::Internal(format!("unexpected backend status {s}: {message}")),
    }
}

// =============================================================================
// Backend wire shapes (private; adapted to core types above)
// =============================================================================

#[derive(Deserialize)]
struct BackendErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct ProductListResponse {
    data: Vec<ProductRow>,
}

#[derive(Deserialize)]
struct ProductRow {
    short_name: String,
    name: String,
}

#[derive(Deserialize)]
struct StateListResponse {
    data: Vec<StateRow>,
}

#[derive(Deserialize)]
struct StateRow {
    name: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Deserialize)]
struct ErratumListResponse {
    data: Vec<ErratumRow>,
}

#[derive(Deserialize)]
struct ErratumRow {
    errata_name: String,
    synopsis: String,
    status: String,
    product: String,
}

#[derive(Deserialize)]
struct ErratumDetailResponse {
    errata_name: String,
    errata_id: u64,
    synopsis: String,
    status: String,
    product: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    errata_type: Option<String>,
    #[serde(default)]
    release: Option<String>,
    #[serde(default)]
    issue_date: Option<DateTime<Utc>>,
    #[serde(default)]
    update_date: Option<DateTime<Utc>>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    embargoed: bool,
    #[serde(default)]
    text_only: bool,
    #[serde(default)]
    content_types: Vec<String>,
    #[serde(default)]
    security_impact: Option<String>,
}
