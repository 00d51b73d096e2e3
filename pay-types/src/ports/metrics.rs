//! Metrics collector port.

use crate::domain::{Amount, Transaction};

/// Receives outcome notifications from a pay system.
///
/// Called concurrently from independent operations; implementations must be
/// thread-safe.
pub trait PayMetrics: Send + Sync {
    fn charge_succeeded(&self, amount: &Amount);

    fn charge_failed(&self);

    fn capture_succeeded(&self, charge: &Transaction, amount: Option<&Amount>);
}
