//! Network Fetch Module
//!
//! The seam between the engine and the network peer. Strategies talk to a
//! `Fetch` implementation; production uses reqwest, tests use scripted mocks.

use std::future::Future;

use crate::engine::FetchRequest;
use crate::error::{EngineError, Result};
use crate::store::StoredResponse;

// == Fetch Trait ==
/// Performs a network fetch for a request, yielding the complete response.
///
/// Implementations must read the body fully: stores hold whole responses,
/// never streams. A fetch that fails at any stage returns
/// [`EngineError::Network`]; strategies convert that into a fallback
/// response rather than propagating it.
pub trait Fetch: Send + Sync + 'static {
    /// Fetches the request from the network.
    fn fetch(
        &self,
        request: &FetchRequest,
    ) -> impl Future<Output = Result<StoredResponse>> + Send;
}

// == HTTP Fetcher ==
/// Production fetcher backed by a reqwest client.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a default client.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<StoredResponse> {
        let response = self
            .client
            .request(request.method.clone(), request.url.clone())
            .send()
            .await
            .map_err(|err| EngineError::Network(err.to_string()))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|err| EngineError::Network(err.to_string()))?;

        Ok(StoredResponse::new(status, headers, body))
    }
}
