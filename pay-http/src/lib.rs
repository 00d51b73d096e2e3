//! # Gateway HTTP Transport
//!
//! [`GatewayTransport`] over a `reqwest` client.

use std::time::Duration;

use async_trait::async_trait;
use pay_types::{GatewayRequest, GatewayTransport, HttpMethod, TransportError};
use reqwest::Client;

/// Sends gateway requests with `reqwest`.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    /// Creates a transport with a default client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing client.
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }

    /// Creates a transport whose calls give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl GatewayTransport for HttpTransport {
    #[tracing::instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn execute(&self, request: GatewayRequest) -> Result<String, TransportError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.http.get(&request.url),
            HttpMethod::Post => self.http.post(&request.url),
            HttpMethod::Put => self.http.put(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        tracing::debug!(status = %status, "gateway responded");

        if status.is_success() {
            Ok(body)
        } else {
            Err(TransportError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}
