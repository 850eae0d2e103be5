//! Payment schedule and integrity checks.
//!
//! An invoice is collected in four slots: a down payment, two interim terms
//! and a final settlement. [`payment_integrity_status`] compares the slots
//! against the grand total and classifies the result. The schedule helpers
//! ([`PaymentSchedule::split_evenly`], [`PaymentSchedule::fill_remaining`]) are
//! conveniences over caller-held state and are independent of the check.

use crate::core::format::rupiah_units;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a schedule against a grand total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntegrityStatus {
    /// Nothing to schedule yet (grand total is zero)
    Info,
    /// Schedule sums exactly to the grand total
    Balanced,
    /// Part of the grand total is not scheduled
    Unallocated,
    /// Schedule exceeds the grand total
    Over,
}

impl IntegrityStatus {
    /// Upper-case name, as shown to operators
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Balanced => "BALANCED",
            Self::Unallocated => "UNALLOCATED",
            Self::Over => "OVER",
        }
    }
}

impl fmt::Display for IntegrityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of [`payment_integrity_status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    /// Classification
    pub status: IntegrityStatus,
    /// Human-readable explanation
    pub message: String,
    /// `floor(grand_total) - scheduled`; positive means unallocated
    pub balance: i64,
}

/// Checks a four-term payment schedule against the grand total.
///
/// The balance is `floor(grand_total)` minus the sum of the slots, so a grand
/// total of `100.9` is settled by a schedule summing to `100`. Classification,
/// first match wins:
/// 1. `grand_total <= 0` (or NaN) → [`IntegrityStatus::Info`]
/// 2. `balance == 0` → [`IntegrityStatus::Balanced`]
/// 3. `balance > 0` → [`IntegrityStatus::Unallocated`]
/// 4. otherwise → [`IntegrityStatus::Over`]
///
/// Any input is accepted, negative slots included. Sums saturate instead of
/// overflowing.
#[must_use]
pub fn payment_integrity_status(
    grand_total: f64,
    down_payment: i64,
    term2: i64,
    term3: i64,
    final_settlement: i64,
) -> IntegrityReport {
    let scheduled = down_payment
        .saturating_add(term2)
        .saturating_add(term3)
        .saturating_add(final_settlement);
    let balance = floor_units(grand_total).saturating_sub(scheduled);

    let (status, message) = if grand_total.is_nan() || grand_total <= 0.0 {
        (
            IntegrityStatus::Info,
            "Add items to cart to calculate payments.".to_string(),
        )
    } else if balance == 0 {
        (
            IntegrityStatus::Balanced,
            "Schedule matches Grand Total.".to_string(),
        )
    } else if balance > 0 {
        (
            IntegrityStatus::Unallocated,
            format!("{} remaining.", rupiah_units(balance)),
        )
    } else {
        (
            IntegrityStatus::Over,
            format!("{} excess.", rupiah_units(balance.saturating_abs())),
        )
    };

    IntegrityReport {
        status,
        message,
        balance,
    }
}

/// The four-slot breakdown of how a grand total is collected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentSchedule {
    /// First payment, taken on booking
    pub down_payment: i64,
    /// Second payment
    pub term2: i64,
    /// Third payment
    pub term3: i64,
    /// Final settlement
    pub final_settlement: i64,
}

impl PaymentSchedule {
    /// Creates a schedule from its four slots.
    #[must_use]
    pub const fn new(down_payment: i64, term2: i64, term3: i64, final_settlement: i64) -> Self {
        Self {
            down_payment,
            term2,
            term3,
            final_settlement,
        }
    }

    /// Slots in collection order.
    #[must_use]
    pub const fn slots(&self) -> [i64; 4] {
        [
            self.down_payment,
            self.term2,
            self.term3,
            self.final_settlement,
        ]
    }

    /// Sum of all slots, saturating.
    #[must_use]
    pub fn total(&self) -> i64 {
        self.slots().into_iter().fold(0, i64::saturating_add)
    }

    /// Runs [`payment_integrity_status`] on this schedule.
    #[must_use]
    pub fn integrity(&self, grand_total: f64) -> IntegrityReport {
        payment_integrity_status(
            grand_total,
            self.down_payment,
            self.term2,
            self.term3,
            self.final_settlement,
        )
    }

    /// Splits the grand total into four roughly equal slots.
    ///
    /// The first three get `floor(grand_total / 4)`; the final slot takes the
    /// remainder so the schedule balances. Does nothing if `grand_total <= 0`.
    pub fn split_evenly(&mut self, grand_total: f64) {
        if grand_total.is_nan() || grand_total <= 0.0 {
            return;
        }
        let total = floor_units(grand_total);
        let quarter = total.div_euclid(4);
        self.down_payment = quarter;
        self.term2 = quarter;
        self.term3 = quarter;
        self.final_settlement = total - quarter * 3;
    }

    /// Puts whatever the first three slots leave unscheduled into the final slot.
    ///
    /// The final slot never goes negative. Does nothing if `grand_total <= 0`.
    pub fn fill_remaining(&mut self, grand_total: f64) {
        if grand_total.is_nan() || grand_total <= 0.0 {
            return;
        }
        let paid = self
            .down_payment
            .saturating_add(self.term2)
            .saturating_add(self.term3);
        self.final_settlement = floor_units(grand_total).saturating_sub(paid).max(0);
    }
}

/// `floor(amount)` as whole units; NaN becomes zero and infinities saturate.
// Cast safety: `as` saturates out-of-range values and maps NaN to 0.
#[allow(clippy::cast_possible_truncation)]
fn floor_units(amount: f64) -> i64 {
    amount.floor() as i64
}
