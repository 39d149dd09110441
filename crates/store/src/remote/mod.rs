//! Remote REST API client.
//!
//! The remote service is advisory: the local cache is authoritative, reads
//! overwrite local state only when they succeed, and writes are attempted
//! exactly once with failures logged and otherwise ignored.
//!
//! # Endpoints
//!
//! | operation | method | path |
//! |-----------|--------|------|
//! | list products | GET | `/products` |
//! | list orders | GET | `/orders` |
//! | create order | POST | `/orders` |
//! | update order | PUT | `/orders/{id}` |
//! | create product | POST | `/products` |
//! | update product | PUT | `/products/{id}` |
//! | delete product | DELETE | `/products/{id}` |
//! | append log | POST | `/logs` |
//! | update user | PUT | `/users/{id}` |

mod ops;

pub use ops::SyncOp;

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, instrument, warn};
use uhsin_core::{Order, Product};
use url::Url;

use crate::cache::{CacheKey, StateCache};

/// Errors that can occur when talking to the remote API.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// API rejected the bearer token; the local token has been evicted.
    #[error("unauthorized")]
    Unauthorized,

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Products and orders pulled in one refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteSnapshot {
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
}

/// Client for the storefront REST API.
///
/// Cheap to clone; clones share the HTTP connection pool and the
/// unauthorized signal.
#[derive(Clone)]
pub struct RemoteClient {
    inner: Arc<RemoteClientInner>,
}

struct RemoteClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Arc<dyn StateCache>,
    unauthorized: broadcast::Sender<()>,
}

impl std::fmt::Debug for RemoteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl RemoteClient {
    /// Create a client for the given API base.
    ///
    /// The bearer token is read from `cache` on every request, so signing in
    /// or out takes effect immediately.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: &Url, cache: Arc<dyn StateCache>) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder().build()?;
        let (unauthorized, _) = broadcast::channel(8);

        Ok(Self {
            inner: Arc::new(RemoteClientInner {
                client,
                base_url: base_url.as_str().trim_end_matches('/').to_string(),
                cache,
                unauthorized,
            }),
        })
    }

    /// Subscribe to the signal raised whenever the API answers 401.
    #[must_use]
    pub fn unauthorized(&self) -> broadcast::Receiver<()> {
        self.inner.unauthorized.subscribe()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut request = self
            .inner
            .client
            .request(method, self.url(path))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        match self.inner.cache.get(CacheKey::Token) {
            Ok(Some(token)) if !token.is_empty() => {
                request = request.header(AUTHORIZATION, format!("Bearer {token}"));
            }
            Ok(_) => {}
            Err(e) => debug!(error = %e, "token unreadable, sending unauthenticated request"),
        }
        request
    }

    /// Send a request and map non-success statuses to errors.
    async fn execute(&self, request: RequestBuilder) -> Result<reqwest::Response, RemoteError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            self.evict_token();
            return Err(RemoteError::Unauthorized);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        Ok(response)
    }

    fn evict_token(&self) {
        warn!("remote API rejected credentials, evicting session token");
        if let Err(e) = self.inner.cache.remove(CacheKey::Token) {
            warn!(error = %e, "failed to evict session token");
        }
        // No receivers is fine: nobody is listening for the signal
        let _ = self.inner.unauthorized.send(());
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, RemoteError> {
        let body = response.text().await?;
        let body = if body.trim().is_empty() { "null" } else { &body };
        Ok(serde_json::from_str(body)?)
    }

    /// GET a JSON resource.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] on transport failure, non-success status, or
    /// an undecodable body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, RemoteError> {
        let response = self.execute(self.request(Method::GET, path)).await?;
        Self::decode(response).await
    }

    /// POST a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] on transport failure, non-success status, or
    /// an undecodable body.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, RemoteError> {
        let response = self
            .execute(self.request(Method::POST, path).json(body))
            .await?;
        Self::decode(response).await
    }

    /// PUT a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] on transport failure, non-success status, or
    /// an undecodable body.
    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, RemoteError> {
        let response = self
            .execute(self.request(Method::PUT, path).json(body))
            .await?;
        Self::decode(response).await
    }

    /// DELETE a resource. The response body is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] on transport failure or non-success status.
    pub async fn delete(&self, path: &str) -> Result<(), RemoteError> {
        self.execute(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    /// Fetch the full catalog.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] if the request fails.
    #[instrument(skip(self))]
    pub async fn fetch_products(&self) -> Result<Vec<Product>, RemoteError> {
        self.get("/products").await
    }

    /// Fetch all orders.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] if the request fails.
    #[instrument(skip(self))]
    pub async fn fetch_orders(&self) -> Result<Vec<Order>, RemoteError> {
        self.get("/orders").await
    }

    /// Fetch products and orders concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first [`RemoteError`]; a partial result is discarded.
    pub async fn fetch_snapshot(&self) -> Result<RemoteSnapshot, RemoteError> {
        let (products, orders) = tokio::try_join!(self.fetch_products(), self.fetch_orders())?;
        Ok(RemoteSnapshot { products, orders })
    }

    /// Perform one write, awaiting the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] if the request fails. Nothing is retried.
    #[instrument(skip(self, op), fields(op = op.label()))]
    pub async fn apply(&self, op: SyncOp) -> Result<(), RemoteError> {
        let path = op.path();
        match op {
            SyncOp::CreateOrder(order) => self.post::<_, serde_json::Value>(&path, &order).await?,
            SyncOp::UpdateOrder(order) => self.put::<_, serde_json::Value>(&path, &order).await?,
            SyncOp::CreateProduct(product) => {
                self.post::<_, serde_json::Value>(&path, &product).await?
            }
            SyncOp::UpdateProduct(product) => {
                self.put::<_, serde_json::Value>(&path, &product).await?
            }
            SyncOp::DeleteProduct(_) => {
                self.delete(&path).await?;
                return Ok(());
            }
            SyncOp::AppendLog(log) => self.post::<_, serde_json::Value>(&path, &log).await?,
            SyncOp::UpdateUser(user) => self.put::<_, serde_json::Value>(&path, &user).await?,
        };
        Ok(())
    }

    /// Fire-and-forget a write on the current tokio runtime.
    ///
    /// Failures are logged at debug level. Outside a runtime the write is
    /// skipped.
    pub fn dispatch(&self, op: SyncOp) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!(op = op.label(), "no async runtime, skipping remote write");
            return;
        };
        let client = self.clone();
        handle.spawn(async move {
            let label = op.label();
            if let Err(e) = client.apply(op).await {
                debug!(op = label, error = %e, "remote write failed, keeping local state");
            }
        });
    }
}
