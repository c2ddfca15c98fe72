//! # Money Module
//!
//! Provides the `Money` type for monetary values and the `DiscountRate`
//! type for percentage discounts.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A 15% discount on a $19.90 candle:                                     │
//! │    19.90 * 0.15 = 2.9849999999999999  → which cent is that?             │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents + Basis Points                             │
//! │    1990 cents * 1500 bps / 10000 = 298.5 → rounds to 299 cents          │
//! │    One deterministic answer, every time                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use candela_core::money::{DiscountRate, Money};
//!
//! let price = Money::from_cents(1990); // $19.90
//! let rate = DiscountRate::from_bps(1500); // 15%
//!
//! assert_eq!(price.percentage_amount(rate).cents(), 299);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: discounts and jar credits can push a total negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use candela_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use candela_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(899); // $8.99 per candle
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.cents(), 2697); // $26.97
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Calculates a percentage of this amount, rounded half-up.
    ///
    /// ## Implementation
    /// Integer math in i128: `(amount * bps + 5000) / 10000`
    /// The +5000 provides rounding (5000/10000 = 0.5).
    ///
    /// ## Example
    /// ```rust
    /// use candela_core::money::{DiscountRate, Money};
    ///
    /// let subtotal = Money::from_cents(10000); // $100.00
    /// let rate = DiscountRate::from_bps(2500); // 25%
    ///
    /// assert_eq!(subtotal.percentage_amount(rate).cents(), 2500); // $25.00
    /// ```
    pub fn percentage_amount(&self, rate: DiscountRate) -> Money {
        // i128 prevents overflow on large amounts
        let cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(cents as i64)
    }
}

// =============================================================================
// Discount Rate
// =============================================================================

/// A percentage rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1500 bps = 15% (a typical ad-hoc discount)
///
/// Rates above 100% (10000 bps) are invalid everywhere in the system and
/// are rejected at construction, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// Creates a rate from basis points without validation.
    ///
    /// Intended for literals and already-validated stored values. Use
    /// [`DiscountRate::try_from_bps`] for anything caller-supplied.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    /// Creates a rate from basis points, rejecting anything above 100%.
    ///
    /// ## Example
    /// ```rust
    /// use candela_core::money::DiscountRate;
    ///
    /// assert!(DiscountRate::try_from_bps(2500).is_ok());
    /// assert!(DiscountRate::try_from_bps(10001).is_err());
    /// ```
    pub fn try_from_bps(bps: u32) -> CoreResult<Self> {
        if bps > 10000 {
            return Err(CoreError::InvalidDiscount {
                value: bps as f64 / 100.0,
            });
        }
        Ok(DiscountRate(bps))
    }

    /// Creates a rate from a percentage, rejecting values outside [0, 100].
    ///
    /// ## Example
    /// ```rust
    /// use candela_core::money::DiscountRate;
    ///
    /// assert_eq!(DiscountRate::try_from_percent(8.25).unwrap().bps(), 825);
    /// assert!(DiscountRate::try_from_percent(-5.0).is_err());
    /// assert!(DiscountRate::try_from_percent(150.0).is_err());
    /// ```
    pub fn try_from_percent(pct: f64) -> CoreResult<Self> {
        if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
            return Err(CoreError::InvalidDiscount { value: pct });
        }
        Ok(DiscountRate((pct * 100.0).round() as u32))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Adds another rate, summing basis points.
    ///
    /// Stacked discounts are summed before application, never compounded.
    /// The sum is deliberately NOT capped at 100%: two large rates may
    /// combine past the subtotal, which surfaces as a negative total on the
    /// priced sale.
    #[inline]
    pub const fn stack(&self, other: DiscountRate) -> Self {
        DiscountRate(self.0 + other.0)
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        DiscountRate::zero()
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging. Use frontend formatting for actual UI display
/// to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
