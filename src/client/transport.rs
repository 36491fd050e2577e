//! Transport seam for the RPC client.
//!
//! `MinimaClient` only needs "GET this URL and give me the body". The HTTP
//! implementation uses reqwest; tests plug in scripted transports.

use crate::utils::TransportError;
use async_trait::async_trait;

/// Performs one GET and returns the raw response body.
///
/// Implementations must not retry or apply their own timeout policy; the
/// client owns both.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn get(&self, url: &str) -> Result<String, TransportError>;
}

/// reqwest-backed transport with a pooled connection client.
#[derive(Clone, Default)]
pub struct HttpTransport {
    inner: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self { inner: reqwest::Client::new() }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String, TransportError> {
        // Status codes are not checked; the node reports failures in the envelope.
        let response = self
            .inner
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        response
            .text()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))
    }
}
