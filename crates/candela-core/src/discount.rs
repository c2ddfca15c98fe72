//! # Discount Calculator
//!
//! Pure pricing for a candidate sale: subtotal, stacked percentage
//! discounts, jar-credit cash discount, shipping, final total.
//!
//! ## Pricing Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       How a Sale is Priced                              │
//! │                                                                         │
//! │  line items ──► subtotal = Σ line totals                               │
//! │                     │                                                   │
//! │  birthday % ──┐     ▼                                                   │
//! │               ├─► discount = subtotal × (birthday + additional)        │
//! │  ad-hoc %  ───┘     │         (rates SUMMED, not compounded)           │
//! │                     ▼                                                   │
//! │  jar credits ──► total = subtotal - discount - jar cash + shipping     │
//! │  shipping   ──┘                                                         │
//! │                                                                         │
//! │  10% + 15% on $100.00 is a flat $25.00 off, never $23.50 compounded    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The total is NOT floored at zero. A sale whose discounts exceed
//! subtotal + shipping prices to a negative total, and the breakdown makes
//! that visible to the caller instead of hiding it.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{DiscountRate, Money};
use crate::types::{Customer, SaleItem, Settings};
use crate::validation::validate_shipping_cents;

// =============================================================================
// Price Breakdown
// =============================================================================

/// The priced result for a candidate item list.
///
/// Every intermediate the UI shows on the sale form is here, so preview
/// and commit price through the same function and can never disagree.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceBreakdown {
    /// Sum of line totals.
    pub subtotal_cents: i64,

    /// Combined percentage discount in basis points (birthday + ad-hoc).
    pub discount_bps: u32,

    /// Cash value of the combined percentage discount.
    pub discount_cents: i64,

    /// Cash value of the consumed jar credits.
    pub jar_discount_cents: i64,

    /// Shipping charged on top.
    pub shipping_cents: i64,

    /// subtotal - discount - jar discount + shipping. May be negative.
    pub total_cents: i64,
}

impl PriceBreakdown {
    /// Returns the final total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Pricing
// =============================================================================

/// Prices a candidate sale.
///
/// ## Arguments
/// * `items` - line items with frozen unit prices
/// * `birthday` - birthday discount rate (zero outside the birth month)
/// * `additional` - ad-hoc discount rate entered on the sale form
/// * `jar_discount` - cash value of consumed jar credits (from the
///   jar-credit allocator)
/// * `shipping` - shipping cost, must be >= 0
///
/// ## Rate Stacking
/// The two rates are summed before being applied to the subtotal. They are
/// never applied sequentially: 10% + 10% means a flat 20% of subtotal, not
/// 19% compounded.
///
/// ## Errors
/// * `InvalidDiscount` if either rate is above 100%
/// * `Validation` if shipping is negative
///
/// ## Example
/// ```rust
/// use candela_core::discount::price_sale;
/// use candela_core::money::{DiscountRate, Money};
/// use candela_core::types::SaleItem;
///
/// let items = vec![SaleItem {
///     product_id: "p-1".into(),
///     product_name: "Pillar Candle".into(),
///     quantity: 4,
///     unit_price_cents: 2500,
///     line_total_cents: 10000,
/// }];
///
/// let breakdown = price_sale(
///     &items,
///     DiscountRate::from_bps(1000), // 10% birthday
///     DiscountRate::from_bps(1500), // 15% ad-hoc
///     Money::from_cents(500),       // 1 jar credit worth $5.00
///     Money::from_cents(800),       // $8.00 shipping
/// )
/// .unwrap();
///
/// assert_eq!(breakdown.discount_cents, 2500);
/// assert_eq!(breakdown.total_cents, 7800); // 100 - 25 - 5 + 8
/// ```
pub fn price_sale(
    items: &[SaleItem],
    birthday: DiscountRate,
    additional: DiscountRate,
    jar_discount: Money,
    shipping: Money,
) -> CoreResult<PriceBreakdown> {
    // Re-check both rates: `DiscountRate::from_bps` is unchecked for
    // literals, and a stored settings value may have been edited by hand.
    for rate in [birthday, additional] {
        if rate.bps() > 10000 {
            return Err(CoreError::InvalidDiscount {
                value: rate.percentage(),
            });
        }
    }
    validate_shipping_cents(shipping.cents())?;

    let subtotal: Money = items
        .iter()
        .fold(Money::zero(), |acc, item| acc + item.line_total());

    let combined = birthday.stack(additional);
    let discount = subtotal.percentage_amount(combined);

    let total = subtotal - discount - jar_discount + shipping;

    Ok(PriceBreakdown {
        subtotal_cents: subtotal.cents(),
        discount_bps: combined.bps(),
        discount_cents: discount.cents(),
        jar_discount_cents: jar_discount.cents(),
        shipping_cents: shipping.cents(),
        total_cents: total.cents(),
    })
}

/// Returns the birthday rate applicable on `today`.
///
/// The configured rate applies when `today` falls in the customer's birth
/// month; otherwise zero. The date is a parameter so the caller (the
/// engine, via its injected clock) owns the notion of "now".
pub fn birthday_rate(customer: &Customer, settings: &Settings, today: NaiveDate) -> DiscountRate {
    if customer.is_birthday_month(today.month()) {
        settings.birthday_rate()
    } else {
        DiscountRate::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(qty: i64, unit_price_cents: i64) -> SaleItem {
        SaleItem {
            product_id: "p-1".to_string(),
            product_name: "Test Candle".to_string(),
            quantity: qty,
            unit_price_cents,
            line_total_cents: unit_price_cents * qty,
        }
    }

    fn settings() -> Settings {
        Settings {
            low_stock_threshold: 5,
            birthday_discount_bps: 1000,
            jar_discount_per_unit_cents: 500,
        }
    }

    #[test]
    fn test_reference_scenario() {
        // subtotal $100, 10% birthday, 15% ad-hoc, $5 jar, $8 shipping
        let items = vec![item(4, 2500)];
        let b = price_sale(
            &items,
            DiscountRate::from_bps(1000),
            DiscountRate::from_bps(1500),
            Money::from_cents(500),
            Money::from_cents(800),
        )
        .unwrap();

        assert_eq!(b.subtotal_cents, 10000);
        assert_eq!(b.discount_bps, 2500);
        assert_eq!(b.discount_cents, 2500);
        assert_eq!(b.total_cents, 7800);
    }

    #[test]
    fn test_rates_sum_instead_of_compounding() {
        let items = vec![item(1, 10000)];
        let b = price_sale(
            &items,
            DiscountRate::from_bps(1000),
            DiscountRate::from_bps(1000),
            Money::zero(),
            Money::zero(),
        )
        .unwrap();

        // Flat 20% of subtotal. Compounding would give 1900.
        assert_eq!(b.discount_cents, 2000);
        assert_eq!(b.total_cents, 8000);
    }

    #[test]
    fn test_rejects_rate_above_hundred_percent() {
        let items = vec![item(1, 1000)];
        let err = price_sale(
            &items,
            DiscountRate::from_bps(10001),
            DiscountRate::zero(),
            Money::zero(),
            Money::zero(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidDiscount { .. }));
    }

    #[test]
    fn test_rejects_negative_shipping() {
        let items = vec![item(1, 1000)];
        let err = price_sale(
            &items,
            DiscountRate::zero(),
            DiscountRate::zero(),
            Money::zero(),
            Money::from_cents(-1),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_total_may_go_negative() {
        // Two large stacked rates exceed the subtotal. The total is
        // reported as-is, not floored.
        let items = vec![item(1, 1000)];
        let b = price_sale(
            &items,
            DiscountRate::from_bps(9000),
            DiscountRate::from_bps(9000),
            Money::zero(),
            Money::zero(),
        )
        .unwrap();
        assert_eq!(b.discount_cents, 1800);
        assert_eq!(b.total_cents, -800);
        assert!(b.total().is_negative());
    }

    #[test]
    fn test_empty_item_list_prices_to_shipping() {
        let b = price_sale(
            &[],
            DiscountRate::zero(),
            DiscountRate::zero(),
            Money::zero(),
            Money::from_cents(800),
        )
        .unwrap();
        assert_eq!(b.subtotal_cents, 0);
        assert_eq!(b.total_cents, 800);
    }

    #[test]
    fn test_birthday_rate_applies_only_in_birth_month() {
        let customer = Customer {
            id: "c-1".to_string(),
            name: "Ada".to_string(),
            birth_month: Some(3),
            birth_day: Some(14),
            jar_credits: 0,
        };
        let settings = settings();

        let in_march = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let in_april = NaiveDate::from_ymd_opt(2026, 4, 2).unwrap();

        assert_eq!(birthday_rate(&customer, &settings, in_march).bps(), 1000);
        assert!(birthday_rate(&customer, &settings, in_april).is_zero());
    }

    #[test]
    fn test_birthday_rate_without_birth_month() {
        let customer = Customer {
            id: "c-1".to_string(),
            name: "Anon".to_string(),
            birth_month: None,
            birth_day: None,
            jar_credits: 0,
        };
        let today = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        assert!(birthday_rate(&customer, &settings(), today).is_zero());
    }
}
