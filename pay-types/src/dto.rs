//! Request objects for pay system operations.

use serde::{Deserialize, Serialize};

use crate::domain::{Account, ActualAccountData, Amount, Transaction, TransactionContext};

// ─────────────────────────────────────────────────────────────────────────────
// Charge & Capture
// ─────────────────────────────────────────────────────────────────────────────

/// Request to charge a payer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeRequest {
    #[serde(default)]
    pub context: TransactionContext,
    /// Payer
    pub from: Account,
    /// Payee
    pub to: Account,
    pub amount: Amount,
    /// Submit for settlement immediately
    #[serde(default = "default_capture")]
    pub capture: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_capture() -> bool {
    true
}

impl ChargeRequest {
    /// A capturing charge with a plain context and no description.
    pub fn new(from: Account, to: Account, amount: Amount) -> Self {
        Self {
            context: TransactionContext::default(),
            from,
            to,
            amount,
            capture: true,
            description: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<TransactionContext>) -> Self {
        self.context = context.into();
        self
    }

    pub fn authorize_only(mut self) -> Self {
        self.capture = false;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Request to capture a prior charge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureRequest {
    pub charge: Transaction,
    /// Settle a different amount than authorized
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CaptureRequest {
    pub fn new(charge: Transaction) -> Self {
        Self {
            charge,
            amount: None,
            description: None,
        }
    }

    pub fn with_amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Refund, Transfer & Verification
// ─────────────────────────────────────────────────────────────────────────────

/// Request to refund a prior charge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundRequest {
    #[serde(default)]
    pub context: TransactionContext,
    pub charge: Transaction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request to transfer funds between accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    #[serde(default)]
    pub context: TransactionContext,
    pub from: Account,
    pub to: Account,
    pub amount: Amount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request to check a potential transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRequest {
    #[serde(default)]
    pub context: TransactionContext,
    /// Verify a transfer rather than a charge
    pub transfer: bool,
    pub from: ActualAccountData,
    pub to: ActualAccountData,
    pub amount: Amount,
}
