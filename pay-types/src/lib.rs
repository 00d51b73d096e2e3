//! # Pay Types
//!
//! Domain types and port traits for the payment gateway adapter.
//! This crate has ZERO external IO dependencies - only data structures,
//! validation rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain` - Pure domain types (Amount, Account, Transaction, Credentials)
//! - `ports` - Trait definitions that gateways and collaborators implement
//! - `dto` - Request objects for pay system operations
//! - `error` - Domain and payment error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    Account, AccountKind, ActualAccountData, Amount, BillingAddress, Credentials, CurrencyCode,
    OrderContext, SettlementStatus, Transaction, TransactionContext, TransactionId,
    TransactionKind, User,
};
pub use dto::*;
pub use error::{DomainError, PaymentError};
pub use ports::{
    AccountResolver, GatewayRequest, GatewayTransport, HttpMethod, PayMetrics, PaySession,
    PaySystem, ResolveError, TransactionIdGenerator, TransportError, UuidTransactionIds,
};
