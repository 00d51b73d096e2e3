//! Transaction domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::Account;
use super::amount::Amount;

/// Unique identifier for a Transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Creates a new random TransactionId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a TransactionId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TransactionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// The kind of financial operation a transaction records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Charge,
    Capture,
    Refund,
    Transfer,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Charge => write!(f, "CHARGE"),
            TransactionKind::Capture => write!(f, "CAPTURE"),
            TransactionKind::Refund => write!(f, "REFUND"),
            TransactionKind::Transfer => write!(f, "TRANSFER"),
        }
    }
}

/// Where the funds of a transaction stand at the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementStatus {
    /// Authorized only; funds move after a capture
    Authorized,
    SubmittedForSettlement,
}

/// A recorded financial transaction.
///
/// Transactions are immutable once created. Operations that advance a
/// transaction (capture) return a new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Internal identifier
    pub id: TransactionId,
    /// Name of the pay system that processed the transaction
    pub system: String,
    pub kind: TransactionKind,
    pub status: SettlementStatus,
    /// Gateway correlation token, used to address the gateway's own record
    pub processor_token: String,
    pub from: Account,
    pub to: Account,
    pub amount: Amount,
    /// Gateway timestamp
    pub processed_at: DateTime<Utc>,
    pub description: Option<String>,
}

impl Transaction {
    /// Creates a charge record.
    #[allow(clippy::too_many_arguments)]
    pub fn charge(
        id: TransactionId,
        system: impl Into<String>,
        processor_token: impl Into<String>,
        from: Account,
        to: Account,
        amount: Amount,
        processed_at: DateTime<Utc>,
        description: Option<String>,
        captured: bool,
    ) -> Self {
        Self {
            id,
            system: system.into(),
            kind: TransactionKind::Charge,
            status: if captured {
                SettlementStatus::SubmittedForSettlement
            } else {
                SettlementStatus::Authorized
            },
            processor_token: processor_token.into(),
            from,
            to,
            amount,
            processed_at,
            description,
        }
    }

    /// True for a charge that still awaits capture.
    pub fn is_capturable(&self) -> bool {
        self.kind == TransactionKind::Charge && self.status == SettlementStatus::Authorized
    }

    /// Returns the capture record derived from this charge.
    pub fn captured(
        &self,
        amount: Amount,
        processed_at: DateTime<Utc>,
        description: Option<String>,
    ) -> Self {
        Self {
            kind: TransactionKind::Capture,
            status: SettlementStatus::SubmittedForSettlement,
            amount,
            processed_at,
            description: description.or_else(|| self.description.clone()),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_charge(captured: bool) -> Transaction {
        Transaction::charge(
            TransactionId::new(),
            "braintree",
            "cust:tok:txn",
            Account::web_nonce("alice", "nonce").unwrap(),
            Account::vaulted("shop", "merchant").unwrap(),
            Amount::parse("USD", "10.00").unwrap(),
            Utc::now(),
            Some("order".into()),
            captured,
        )
    }

    #[test]
    fn test_charge_creation() {
        let tx = sample_charge(false);
        assert_eq!(tx.kind, TransactionKind::Charge);
        assert_eq!(tx.status, SettlementStatus::Authorized);
        assert!(tx.is_capturable());
    }

    #[test]
    fn test_captured_charge_is_not_capturable() {
        let tx = sample_charge(true);
        assert_eq!(tx.status, SettlementStatus::SubmittedForSettlement);
        assert!(!tx.is_capturable());
    }

    #[test]
    fn test_capture_keeps_identity() {
        let charge = sample_charge(false);
        let settled_at = Utc::now();
        let capture = charge.captured(Amount::parse("USD", "7.50").unwrap(), settled_at, None);

        assert_eq!(capture.id, charge.id);
        assert_eq!(capture.processor_token, charge.processor_token);
        assert_eq!(capture.kind, TransactionKind::Capture);
        assert_eq!(capture.amount.value().to_string(), "7.50");
        assert_eq!(capture.description, Some("order".into()));
        assert!(!capture.is_capturable());
        // the charge record is untouched
        assert_eq!(charge.amount.value().to_string(), "10.00");
    }
}
