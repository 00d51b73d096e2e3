//! Error types for the payment gateway adapter.

use crate::domain::CurrencyCode;
use crate::ports::{ResolveError, TransportError};

/// Domain-level errors (invalid values).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Amount cannot be negative")]
    NegativeAmount,

    #[error("Invalid currency code: {0:?}")]
    InvalidCurrency(String),

    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch {
        expected: CurrencyCode,
        got: CurrencyCode,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Errors surfaced by pay system operations.
///
/// `GatewayRejected` displays the gateway's own message verbatim.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("{system}: session is invalid ({operation})")]
    SessionInvalid {
        system: String,
        operation: &'static str,
    },

    #[error("{system}: credentials of kind '{kind}' cannot authorize gateway calls")]
    UnsupportedCredentials { system: String, kind: &'static str },

    #[error("{message}")]
    GatewayRejected {
        message: String,
        #[source]
        source: TransportError,
    },

    #[error("{message}")]
    TransportFailure {
        message: String,
        #[source]
        source: TransportError,
    },

    #[error("{system}: malformed gateway response to {operation}: {reason}")]
    MalformedResponse {
        system: String,
        operation: &'static str,
        reason: String,
    },

    #[error("{system}: {operation} is not supported")]
    UnsupportedOperation {
        system: String,
        operation: &'static str,
    },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("Account resolution failed: {0}")]
    AccountResolution(#[from] ResolveError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Cannot encode gateway request: {0}")]
    Encoding(String),
}

impl PaymentError {
    /// True when the failure happened after the gateway exchange started.
    pub fn is_gateway_failure(&self) -> bool {
        matches!(
            self,
            PaymentError::GatewayRejected { .. }
                | PaymentError::TransportFailure { .. }
                | PaymentError::MalformedResponse { .. }
        )
    }
}
