//! Pay system port.
//!
//! The contract every gateway integration implements. Operations a gateway
//! does not support must fail with `PaymentError::UnsupportedOperation`.

use uuid::Uuid;

use crate::domain::{Transaction, User};
use crate::dto::{CaptureRequest, ChargeRequest, RefundRequest, TransferRequest, VerifyRequest};
use crate::error::PaymentError;

/// A short-lived handle for one logical interaction with a gateway.
pub trait PaySession: Send + Sync {
    fn id(&self) -> Uuid;

    /// True once constructed, false after the session was ended.
    fn is_valid(&self) -> bool;

    fn user(&self) -> &User;
}

/// Port trait for payment gateway integrations.
#[async_trait::async_trait]
pub trait PaySystem: Send + Sync {
    type Session: PaySession;
    type ConnectionParameters: Send + Sync;

    /// Name recorded on every transaction this system creates.
    fn name(&self) -> &str;

    /// Opens a session, falling back to the system's default parameters.
    fn start_session(
        &self,
        params: Option<Self::ConnectionParameters>,
    ) -> Result<Self::Session, PaymentError>;

    // ─────────────────────────────────────────────────────────────────────────────
    // Money Movement
    // ─────────────────────────────────────────────────────────────────────────────

    /// Authorizes (and optionally captures) a sale.
    async fn charge(
        &self,
        session: &Self::Session,
        req: ChargeRequest,
    ) -> Result<Transaction, PaymentError>;

    /// Submits an authorized charge for settlement, returning the updated record.
    async fn capture(
        &self,
        session: &Self::Session,
        req: CaptureRequest,
    ) -> Result<Transaction, PaymentError>;

    /// Returns funds of a prior charge.
    async fn refund(
        &self,
        session: &Self::Session,
        req: RefundRequest,
    ) -> Result<Transaction, PaymentError>;

    /// Moves funds between two accounts.
    async fn transfer(
        &self,
        session: &Self::Session,
        req: TransferRequest,
    ) -> Result<Transaction, PaymentError>;

    /// Checks whether a transaction would be accepted without executing it.
    async fn verify_potential_transaction(
        &self,
        session: &Self::Session,
        req: VerifyRequest,
    ) -> Result<(), PaymentError>;
}
