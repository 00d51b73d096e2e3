//! Transaction id generator port.

use crate::domain::{TransactionContext, TransactionId, TransactionKind};

use super::PaySession;

/// Issues internal transaction ids.
pub trait TransactionIdGenerator: Send + Sync {
    fn generate(
        &self,
        session: &dyn PaySession,
        context: &TransactionContext,
        kind: TransactionKind,
    ) -> TransactionId;
}

/// Generator issuing random v4 UUIDs regardless of its inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidTransactionIds;

impl TransactionIdGenerator for UuidTransactionIds {
    fn generate(
        &self,
        _session: &dyn PaySession,
        _context: &TransactionContext,
        _kind: TransactionKind,
    ) -> TransactionId {
        TransactionId::new()
    }
}
