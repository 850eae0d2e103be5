//! Currency display formatting.
//!
//! Amounts are shown in whole rupiah with `.` as the thousands separator,
//! e.g. `Rp 1.250.000`. Rounding happens here and only here; the calculators
//! keep full precision.

/// Prefix placed before every formatted amount.
pub const CURRENCY_PREFIX: &str = "Rp";

/// Formats an amount as rupiah, rounding to the nearest whole unit.
///
/// Exact halves round to the even unit, so `2.5` shows as `Rp 2`.
///
/// Non-finite input (NaN, infinity) is treated as zero.
///
/// # Examples
/// ```
/// use invoice_desk::core::format::rupiah;
/// assert_eq!(rupiah(1_250_000.0), "Rp 1.250.000");
/// assert_eq!(rupiah(f64::NAN), "Rp 0");
/// ```
#[must_use]
pub fn rupiah(amount: f64) -> String {
    rupiah_units(whole_units(amount))
}

/// Formats an amount that is already in whole units.
#[must_use]
pub fn rupiah_units(units: i64) -> String {
    format!("{CURRENCY_PREFIX} {}", group_thousands(units))
}

/// Inserts `.` between every group of three digits, keeping the sign.
#[must_use]
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Rounds to the nearest whole unit, ties to even; non-finite values become zero.
// Cast safety: `as` saturates at the i64 bounds for absurdly large display values.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn whole_units(amount: f64) -> i64 {
    if !amount.is_finite() {
        return 0;
    }
    amount.round_ties_even() as i64
}
