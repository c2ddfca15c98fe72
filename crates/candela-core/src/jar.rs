//! # Jar-Credit Allocator
//!
//! Determines how many of a customer's returnable-jar credits a candidate
//! sale can consume.
//!
//! ## The Jar Deposit Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Customer returns empty jars  ──►  jar_credits += returned             │
//! │          (host CRUD, outside this engine)                              │
//! │                                                                         │
//! │  Customer buys candles        ──►  allocate() previews how many        │
//! │                                    credits this sale can redeem        │
//! │                                                                         │
//! │  Sale commits (non-cancelled) ──►  engine debits jar_credits           │
//! │                                                                         │
//! │  1 credit = 1 sold unit = a fixed cash discount                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `allocate` is a preview. Nothing is debited here; the engine debits the
//! customer's balance only when the sale actually commits with a
//! non-cancelled status.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Customer, SaleItem};

/// Result of a jar-credit allocation preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct JarAllocation {
    /// Credits this sale would consume.
    pub credits_used: i64,

    /// Cash discount those credits are worth (credits_used × per-unit
    /// value), in cents.
    pub cash_cents: i64,
}

impl JarAllocation {
    /// An allocation consuming nothing.
    pub const fn none() -> Self {
        JarAllocation {
            credits_used: 0,
            cash_cents: 0,
        }
    }

    /// Returns the cash discount as Money.
    #[inline]
    pub fn cash(&self) -> Money {
        Money::from_cents(self.cash_cents)
    }
}

/// Previews the jar credits consumable by a candidate sale.
///
/// ## Algorithm
/// One sold unit can redeem one credit, regardless of product type:
/// `credits_used = min(total units, customer balance)`.
///
/// Returns the empty allocation when the per-unit value is not positive or
/// the customer has no credits.
///
/// ## Example
/// ```rust
/// use candela_core::jar::allocate;
/// use candela_core::money::Money;
/// use candela_core::types::{Customer, SaleItem};
///
/// let customer = Customer {
///     id: "c-1".into(),
///     name: "Ada".into(),
///     birth_month: None,
///     birth_day: None,
///     jar_credits: 2,
/// };
/// let items = vec![SaleItem {
///     product_id: "p-1".into(),
///     product_name: "Jar Candle".into(),
///     quantity: 5,
///     unit_price_cents: 1200,
///     line_total_cents: 6000,
/// }];
///
/// // 5 units sold but only 2 credits on balance
/// let allocation = allocate(&customer, &items, Money::from_cents(500));
/// assert_eq!(allocation.credits_used, 2);
/// assert_eq!(allocation.cash_cents, 1000);
/// ```
pub fn allocate(customer: &Customer, items: &[SaleItem], per_unit: Money) -> JarAllocation {
    if !per_unit.is_positive() || customer.jar_credits <= 0 {
        return JarAllocation::none();
    }

    let total_units: i64 = items.iter().map(|i| i.quantity).sum();
    let credits_used = total_units.min(customer.jar_credits);

    JarAllocation {
        credits_used,
        cash_cents: per_unit.multiply_quantity(credits_used).cents(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
