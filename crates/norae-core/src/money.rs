//! # Money Module
//!
//! Provides the `Won` type for monetary values in Korean won.
//!
//! ## Why Integer Won?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  The venue's books arrive from a JavaScript frontend and a remote   │
//! │  store, so prices show up as doubles:                               │
//! │    30000.0, 29999.999999, NaN, -5000, Infinity                      │
//! │                                                                     │
//! │  The won has no fractional unit. Every amount in the ledger is an   │
//! │  i64 number of won; anything non-finite, negative, or fractional    │
//! │  is coerced on the way in (→ 0, → 0, → floor) and never rejected.   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use norae_core::money::Won;
//!
//! let price = Won::new(30_000);
//! let total = price * 2;
//! assert_eq!(total.amount(), 60_000);
//!
//! // Tolerant coercion for external input
//! assert_eq!(Won::sanitize(f64::NAN).amount(), 0);
//! assert_eq!(Won::sanitize(-500.0).amount(), 0);
//! assert_eq!(Won::sanitize(4999.9).amount(), 4_999);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

// =============================================================================
// Won Type
// =============================================================================

/// A monetary value in whole Korean won.
///
/// ## Design Decisions
/// - **i64 (signed)**: arithmetic may pass through negative intermediates
///   (e.g. `total - cash` before clamping), so the representation is signed
///   even though every stored ledger amount is kept ≥ 0.
/// - **Single field tuple struct**: zero-cost abstraction over i64.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Won(i64);

impl Won {
    /// Creates a value from a whole number of won.
    #[inline]
    pub const fn new(amount: i64) -> Self {
        Won(amount)
    }

    /// Returns the raw amount in won.
    #[inline]
    pub const fn amount(&self) -> i64 {
        self.0
    }

    /// Zero won.
    #[inline]
    pub const fn zero() -> Self {
        Won(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Coerces an untrusted floating-point amount into a valid won value.
    ///
    /// ## Coercion Rules
    /// - non-finite (NaN, ±∞) → 0
    /// - negative → 0
    /// - fractional → floored
    ///
    /// Every numeric input that crosses the core's boundary (catalog prices,
    /// payment amounts) goes through this; malformed money is normalized,
    /// never an error.
    pub fn sanitize(value: f64) -> Self {
        if !value.is_finite() {
            return Won(0);
        }
        Won((value.floor() as i64).max(0))
    }

    /// Clamps an integer amount to ≥ 0.
    #[inline]
    pub const fn clamp_non_negative(amount: i64) -> Self {
        if amount < 0 {
            Won(0)
        } else {
            Won(amount)
        }
    }

    /// Subtracts, flooring the result at zero.
    ///
    /// This is the shape of every "remaining amount" computation in the
    /// ledger: `card = max(0, total - cash)`.
    #[inline]
    pub const fn saturating_sub_floor(&self, other: Won) -> Won {
        Won::clamp_non_negative(self.0 - other.0)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display with thousands separators, matching the frontend's
/// comma formatting ("30,000").
impl fmt::Display for Won {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}", sign, grouped)
    }
}

impl Add for Won {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Won(self.0 + other.0)
    }
}

impl AddAssign for Won {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Won {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Won(self.0 - other.0)
    }
}

/// Multiplication by a quantity (line totals).
impl Mul<i64> for Won {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Won(self.0 * qty)
    }
}

impl Sum for Won {
    fn sum<I: Iterator<Item = Won>>(iter: I) -> Won {
        iter.fold(Won::zero(), |acc, x| acc + x)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
