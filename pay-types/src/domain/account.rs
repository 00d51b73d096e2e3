//! Account references and the billing data they resolve to.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// How the payment method behind an account was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountKind {
    /// Single-use token produced by a hosted payment form.
    WebNonce,
    /// Reusable token of a payment method already stored in the gateway vault.
    Vaulted,
}

/// Opaque reference to a payer or payee.
///
/// `account_id` is the nonce or vaulted token the gateway understands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Account {
    /// Owner of the account in the caller's system (user, merchant, ...)
    pub identity: String,
    /// Nonce or vaulted token
    pub account_id: String,
    pub kind: AccountKind,
}

impl Account {
    /// Creates a new account reference.
    ///
    /// # Validation
    /// - Account id cannot be blank
    pub fn new(
        identity: impl Into<String>,
        account_id: impl Into<String>,
        kind: AccountKind,
    ) -> Result<Self, DomainError> {
        let account_id = account_id.into();
        if account_id.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Account id cannot be empty".into(),
            ));
        }
        Ok(Self {
            identity: identity.into(),
            account_id,
            kind,
        })
    }

    /// Account backed by a one-time web nonce.
    pub fn web_nonce(
        identity: impl Into<String>,
        nonce: impl Into<String>,
    ) -> Result<Self, DomainError> {
        Self::new(identity, nonce, AccountKind::WebNonce)
    }

    /// Account backed by a vaulted payment-method token.
    pub fn vaulted(
        identity: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, DomainError> {
        Self::new(identity, token, AccountKind::Vaulted)
    }

    pub fn is_web_nonce(&self) -> bool {
        self.kind == AccountKind::WebNonce
    }
}

impl std::fmt::Display for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Tokens are payment credentials; only the owner is printed.
        write!(f, "{}({:?})", self.identity, self.kind)
    }
}

/// Postal billing address. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingAddress {
    pub street: Option<String>,
    pub extended: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    /// ISO-3166 alpha-3 country code
    pub country: Option<String>,
    pub company: Option<String>,
}

/// Billing detail for an [`Account`], produced by an account resolver per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActualAccountData {
    pub account: Account,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub billing_address: BillingAddress,
}

impl ActualAccountData {
    /// Resolved data with no billing detail.
    pub fn bare(account: Account) -> Self {
        Self {
            account,
            first_name: None,
            last_name: None,
            billing_address: BillingAddress::default(),
        }
    }
}
