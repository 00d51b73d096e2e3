//! Gateway transport port.
//!
//! A transport executes one fully-built HTTP request and hands back the raw
//! body. Connection handling, TLS and timeouts are the implementation's
//! business.

use std::fmt;

/// HTTP verbs used against the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
            HttpMethod::Put => write!(f, "PUT"),
        }
    }
}

/// A fully-built gateway request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    /// JSON body, already serialized
    pub body: Option<String>,
}

impl GatewayRequest {
    /// Returns the value of a header, if present.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Why a transport call did not produce a success body.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// The gateway answered with a non-success status; the body may carry a
    /// structured error.
    #[error("gateway responded with HTTP {status}")]
    Status { status: u16, body: String },

    /// The call failed below the application layer (DNS, connect, timeout...).
    #[error("transport failure: {0}")]
    Network(String),
}

/// Port trait for the HTTP collaborator.
#[async_trait::async_trait]
pub trait GatewayTransport: Send + Sync {
    /// Executes the request, returning the body of a success response.
    async fn execute(&self, request: GatewayRequest) -> Result<String, TransportError>;
}
