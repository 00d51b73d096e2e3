//! Port traits (interfaces for adapters and collaborators).
//!
//! The orchestrator depends on these traits, not concrete implementations.

mod ids;
mod metrics;
mod pay_system;
mod resolver;
mod transport;

pub use ids::{TransactionIdGenerator, UuidTransactionIds};
pub use metrics::PayMetrics;
pub use pay_system::{PaySession, PaySystem};
pub use resolver::{AccountResolver, ResolveError};
pub use transport::{GatewayRequest, GatewayTransport, HttpMethod, TransportError};
