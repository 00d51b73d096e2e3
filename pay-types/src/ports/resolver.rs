//! Account resolver port.
//!
//! Turns a logical [`Account`] into the billing data a gateway needs.
//! Implementations may hit a database or a user profile service.

use crate::domain::{Account, ActualAccountData, TransactionContext};

/// Error type for account resolution.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Account not found: {0}")]
    NotFound(String),

    #[error("Resolver unavailable: {0}")]
    Unavailable(String),
}

/// Port trait for account resolvers.
#[async_trait::async_trait]
pub trait AccountResolver: Send + Sync {
    /// Resolves the billing data of `account` within `context`.
    async fn resolve(
        &self,
        context: &TransactionContext,
        account: &Account,
    ) -> Result<ActualAccountData, ResolveError>;
}
