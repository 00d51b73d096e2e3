//! In-process metrics collector.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use pay_types::{Amount, CurrencyCode, PayMetrics, Transaction};
use rust_decimal::Decimal;

/// Running counters for a pay system. Created with the system, never reset.
#[derive(Debug, Default)]
pub struct AtomicPayMetrics {
    charges: AtomicU64,
    charge_errors: AtomicU64,
    captures: AtomicU64,
    charged_totals: DashMap<CurrencyCode, Decimal>,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub charges: u64,
    pub charge_errors: u64,
    pub captures: u64,
    pub charged_totals: HashMap<CurrencyCode, Decimal>,
}

impl AtomicPayMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            charges: self.charges.load(Ordering::Relaxed),
            charge_errors: self.charge_errors.load(Ordering::Relaxed),
            captures: self.captures.load(Ordering::Relaxed),
            charged_totals: self
                .charged_totals
                .iter()
                .map(|entry| (entry.key().clone(), *entry.value()))
                .collect(),
        }
    }
}

impl PayMetrics for AtomicPayMetrics {
    fn charge_succeeded(&self, amount: &Amount) {
        self.charges.fetch_add(1, Ordering::Relaxed);
        let mut total = self
            .charged_totals
            .entry(amount.currency().clone())
            .or_insert(Decimal::ZERO);
        match total.checked_add(amount.value()) {
            Some(sum) => *total = sum,
            None => {
                *total = Decimal::MAX;
                tracing::warn!(currency = %amount.currency(), "charged total saturated");
            }
        }
    }

    fn charge_failed(&self) {
        self.charge_errors.fetch_add(1, Ordering::Relaxed);
    }

    fn capture_succeeded(&self, _charge: &Transaction, _amount: Option<&Amount>) {
        self.captures.fetch_add(1, Ordering::Relaxed);
    }
}
