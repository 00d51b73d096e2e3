//! Account resolver fed from command-line billing flags.

use async_trait::async_trait;
use pay_types::{
    Account, AccountResolver, ActualAccountData, BillingAddress, ResolveError, TransactionContext,
};

/// Resolves every account to the same holder name and billing address.
pub struct FlagResolver {
    first_name: Option<String>,
    last_name: Option<String>,
    billing_address: BillingAddress,
}

impl FlagResolver {
    pub fn new(
        first_name: Option<String>,
        last_name: Option<String>,
        billing_address: BillingAddress,
    ) -> Self {
        Self {
            first_name,
            last_name,
            billing_address,
        }
    }
}

#[async_trait]
impl AccountResolver for FlagResolver {
    async fn resolve(
        &self,
        _context: &TransactionContext,
        account: &Account,
    ) -> Result<ActualAccountData, ResolveError> {
        Ok(ActualAccountData {
            account: account.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            billing_address: self.billing_address.clone(),
        })
    }
}
