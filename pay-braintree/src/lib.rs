//! # Pay Braintree
//!
//! Braintree gateway integration: the transaction orchestrator and the
//! pieces it is built from.
//!
//! ## Architecture
//!
//! - `system` - `BraintreeSystem`, the `PaySystem` implementation (orchestration, error mapping)
//! - `session` - Connection parameters and sessions
//! - `auth` - Authorization headers per credential kind
//! - `wire` - Request bodies, typed response schemas, failure translation
//! - `metrics` - Atomic in-process counters
//!
//! The system is generic over `T: GatewayTransport`, allowing different HTTP
//! adapters (or test doubles) to be injected.

pub mod auth;
pub mod metrics;
pub mod session;
pub mod system;
pub mod wire;


pub use metrics::{AtomicPayMetrics, MetricsSnapshot};
pub use session::{BraintreeSession, ConnectionParameters, PRODUCTION_API_URI, SANDBOX_API_URI};
pub use system::{BraintreeSystem, SYSTEM_NAME};
pub use wire::CorrelationToken;
