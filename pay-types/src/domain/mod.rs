//! Domain models for the payment gateway adapter.

pub mod account;
pub mod amount;
pub mod context;
pub mod credentials;
pub mod transaction;

pub use account::{Account, AccountKind, ActualAccountData, BillingAddress};
pub use amount::{Amount, CurrencyCode};
pub use context::{OrderContext, TransactionContext};
pub use credentials::{Credentials, User};
pub use transaction::{SettlementStatus, Transaction, TransactionId, TransactionKind};
