//! # Domain Types
//!
//! Core domain types for the candle shop: catalog, customers, sales,
//! orders, and settings.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  quantity       │   │  items (frozen) │   │  items (frozen) │       │
//! │  │  bill of mats   │   │  status         │   │  status         │       │
//! │  │  price history  │   │  total_cents    │   │  delivered_at   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Material     │   │    Customer     │   │    Settings     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  current_stock  │   │  birth month    │   │  thresholds     │       │
//! │  │  alert level    │   │  jar credits    │   │  discount rates │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Ownership
//! Sale and Order own denormalized copies of their line items (name and
//! unit price frozen at transaction time). A later product rename or price
//! change must never rewrite transaction history.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{DiscountRate, Money};

// =============================================================================
// Product
// =============================================================================

/// One bill-of-materials line: how much of a material one produced unit
/// consumes, and what that material costs.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BomLine {
    /// Material consumed by this product.
    pub material_id: String,

    /// Quantity of the material per produced unit.
    pub quantity_per_unit: i64,

    /// Cost of one material unit in cents.
    pub cost_per_unit_cents: i64,
}

/// An append-only price history entry.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceChange {
    /// The new unit price in cents.
    pub price_cents: i64,

    /// When the price changed.
    #[ts(as = "String")]
    pub changed_at: DateTime<Utc>,

    /// Free-form reason ("wax supplier increase", "seasonal").
    pub reason: String,
}

/// A product available for sale (a finished candle).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier.
    pub id: String,

    /// Display name shown in the catalog and on invoices.
    pub name: String,

    /// Optional category ("jar candles", "tealights").
    pub category: Option<String>,

    /// Unit price in cents.
    pub unit_price_cents: i64,

    /// Current on-hand quantity. Never negative.
    pub quantity: i64,

    /// Materials consumed to produce one unit. Empty for resold goods.
    pub bill_of_materials: Vec<BomLine>,

    /// Append-only price history, timestamps non-decreasing.
    pub price_history: Vec<PriceChange>,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Appends a price change and updates the unit price.
    ///
    /// The history is append-only and ordered: an entry timestamped before
    /// the latest recorded change is rejected rather than spliced in.
    pub fn record_price_change(&mut self, entry: PriceChange) -> CoreResult<()> {
        if let Some(last) = self.price_history.last() {
            if entry.changed_at < last.changed_at {
                return Err(CoreError::Validation(
                    crate::error::ValidationError::OutOfRange {
                        field: "price change timestamp".to_string(),
                        min: last.changed_at.timestamp(),
                        max: i64::MAX,
                    },
                ));
            }
        }
        self.unit_price_cents = entry.price_cents;
        self.price_history.push(entry);
        Ok(())
    }
}

// =============================================================================
// Material
// =============================================================================

/// A raw material (wax, wicks, fragrance oil, jars).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Material {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Unit label for display ("kg", "pcs", "ml").
    pub unit: String,

    /// Current stock on hand. Conceptually never negative; the planner only
    /// flags deficits, it does not enforce this.
    pub current_stock: i64,

    /// Stock level at or below which the material is flagged.
    pub alert_threshold: i64,

    /// Cost of one unit in cents.
    pub cost_per_unit_cents: i64,
}

impl Material {
    /// Checks whether current stock has reached the alert threshold.
    #[inline]
    pub fn is_below_alert(&self) -> bool {
        self.current_stock <= self.alert_threshold
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A customer, including their returnable-jar credit balance.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customer {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Birth month (1-12), if known. Drives the birthday discount.
    pub birth_month: Option<u32>,

    /// Birth day of month, if known. Display only.
    pub birth_day: Option<u32>,

    /// Returned-jar credit balance. Each credit is redeemable for a fixed
    /// cash discount on exactly one sold unit. Never negative.
    pub jar_credits: i64,
}

impl Customer {
    /// Checks whether the given month is the customer's birth month.
    #[inline]
    pub fn is_birthday_month(&self, month: u32) -> bool {
        self.birth_month == Some(month)
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line item in a sale or order.
/// Uses the snapshot pattern to freeze product data at transaction time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleItem {
    /// Reference to the product (for stock mutation).
    pub product_id: String,

    /// Product name at transaction time (frozen).
    pub product_name: String,

    /// Quantity sold. Always positive.
    pub quantity: i64,

    /// Unit price in cents at transaction time (frozen).
    pub unit_price_cents: i64,

    /// Line total (unit price × quantity).
    pub line_total_cents: i64,
}

impl SaleItem {
    /// Creates a line item from a product, freezing name and price.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        SaleItem {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            quantity,
            unit_price_cents: product.unit_price_cents,
            line_total_cents: product.unit_price_cents * quantity,
        }
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

// =============================================================================
// Sale Status
// =============================================================================

/// The status of a sale.
///
/// ## Lifecycle
/// ```text
/// Pending ⇄ AwaitingPayment ⇄ Cancelled
///     \          |            /
///      \         |           /   (payment method required)
///       ▼        ▼          ▼
///              Paid  (terminal)
/// ```
/// Paid is terminal: no status leaves it. Cancelled is NOT terminal for
/// sales; un-cancelling re-checks stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Sale recorded, goods possibly reserved, nothing collected yet.
    Pending,
    /// Goods handed over, payment outstanding.
    AwaitingPayment,
    /// Payment received and recognized. Terminal.
    Paid,
    /// Sale called off; reserved stock has been returned.
    Cancelled,
}

impl SaleStatus {
    /// Checks whether a transition to `next` is allowed.
    ///
    /// Every status except Paid may move to any other status. Paid is
    /// terminal.
    pub fn can_transition_to(&self, next: SaleStatus) -> bool {
        if *self == SaleStatus::Paid {
            return false;
        }
        *self != next
    }
}

impl Default for SaleStatus {
    fn default() -> Self {
        SaleStatus::Pending
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on an external terminal.
    Card,
    /// Bank transfer.
    Transfer,
}

// =============================================================================
// Sale
// =============================================================================

/// A sale transaction.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    pub id: String,
    pub customer_id: String,
    /// Line items, frozen at commit time.
    pub items: Vec<SaleItem>,
    /// Sum of line totals.
    pub subtotal_cents: i64,
    /// Sum of the stacked percentage discounts, in basis points.
    pub discount_bps: u32,
    /// Cash value of the percentage discount (derived from subtotal).
    pub discount_cents: i64,
    /// Jar credits consumed by this sale.
    pub jar_credits_used: i64,
    /// Cash value of the consumed jar credits.
    pub jar_discount_cents: i64,
    /// Shipping charged on top.
    pub shipping_cents: i64,
    /// subtotal - discount - jar discount + shipping. May be negative when
    /// discounts exceed the rest; callers decide how to surface that.
    pub total_cents: i64,
    pub status: SaleStatus,
    /// Required when status is Paid.
    pub payment_method: Option<PaymentMethod>,
    #[ts(as = "String")]
    pub sale_date: NaiveDate,
    /// True when this sale was generated by delivering an order. Such sales
    /// never touch finished-goods stock; production already consumed
    /// materials through its own workflow.
    pub from_order: bool,
    pub notes: Option<String>,
}

impl Sale {
    /// Returns the final total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Total units across all line items.
    pub fn total_units(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// The status of a make-to-order production order.
///
/// ## Lifecycle
/// ```text
/// Pending → InProduction → ReadyForDelivery → Delivered  (terminal)
///    \           |               /
///     └──────────┴──────────────┴─────────→ Cancelled    (terminal)
/// ```
/// Delivered triggers sale creation; both terminal states accept no
/// further transitions. Movement between the three open states is free in
/// either direction (production reality beats workflow purity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    InProduction,
    ReadyForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Checks whether this status accepts any further transition.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Checks whether a transition to `next` is allowed.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        !self.is_terminal() && *self != next
    }

    /// True for statuses whose quantities count as production backlog.
    #[inline]
    pub fn is_open_for_production(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::InProduction)
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

// =============================================================================
// Order
// =============================================================================

/// A make-to-order production order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    pub id: String,
    pub customer_id: String,
    /// Line items, frozen at order time.
    pub items: Vec<SaleItem>,
    #[ts(as = "String")]
    pub order_date: NaiveDate,
    #[ts(as = "Option<String>")]
    pub expected_delivery: Option<NaiveDate>,
    /// Stamped when the order reaches Delivered.
    #[ts(as = "Option<String>")]
    pub delivered_at: Option<NaiveDate>,
    pub status: OrderStatus,
    /// Recorded at delivery time; delivery implies payment received.
    pub payment_method: Option<PaymentMethod>,
    pub notes: Option<String>,
}

impl Order {
    /// Sum of line totals.
    pub fn subtotal(&self) -> Money {
        self.items
            .iter()
            .fold(Money::zero(), |acc, i| acc + i.line_total())
    }
}

// =============================================================================
// Settings
// =============================================================================

/// Engine-relevant settings, read-only here. The host owns editing.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Settings {
    /// Finished-goods level at or below which a product counts as low
    /// stock; also the auto-fill target for production planning.
    pub low_stock_threshold: i64,

    /// Discount applied during a customer's birth month, in basis points.
    pub birthday_discount_bps: u32,

    /// Cash value of one returned jar credit, in cents.
    pub jar_discount_per_unit_cents: i64,
}

impl Settings {
    /// Returns the birthday discount as a rate.
    #[inline]
    pub fn birthday_rate(&self) -> DiscountRate {
        DiscountRate::from_bps(self.birthday_discount_bps)
    }

    /// Returns the per-jar credit value as Money.
    #[inline]
    pub fn jar_discount_per_unit(&self) -> Money {
        Money::from_cents(self.jar_discount_per_unit_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_product() -> Product {
        Product {
            id: "p-1".to_string(),
            name: "Lavender Jar 250g".to_string(),
            category: Some("jar candles".to_string()),
            unit_price_cents: 1200,
            quantity: 10,
            bill_of_materials: Vec::new(),
            price_history: Vec::new(),
        }
    }

    #[test]
    fn test_sale_item_freezes_product_data() {
        let mut product = test_product();
        let item = SaleItem::from_product(&product, 3);

        product.name = "Renamed".to_string();
        product.unit_price_cents = 9999;

        assert_eq!(item.product_name, "Lavender Jar 250g");
        assert_eq!(item.unit_price_cents, 1200);
        assert_eq!(item.line_total_cents, 3600);
    }

    #[test]
    fn test_price_history_is_append_only_and_ordered() {
        let mut product = test_product();
        let t1 = Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2026, 2, 10, 9, 0, 0).unwrap();

        product
            .record_price_change(PriceChange {
                price_cents: 1300,
                changed_at: t2,
                reason: "wax supplier increase".to_string(),
            })
            .unwrap();
        assert_eq!(product.unit_price_cents, 1300);

        // Back-dated entry is rejected, history stays intact
        let err = product.record_price_change(PriceChange {
            price_cents: 1100,
            changed_at: t1,
            reason: "oops".to_string(),
        });
        assert!(err.is_err());
        assert_eq!(product.price_history.len(), 1);
        assert_eq!(product.unit_price_cents, 1300);
    }

    #[test]
    fn test_sale_status_paid_is_terminal() {
        assert!(!SaleStatus::Paid.can_transition_to(SaleStatus::Pending));
        assert!(!SaleStatus::Paid.can_transition_to(SaleStatus::Cancelled));

        assert!(SaleStatus::Pending.can_transition_to(SaleStatus::Paid));
        assert!(SaleStatus::Cancelled.can_transition_to(SaleStatus::AwaitingPayment));
    }

    #[test]
    fn test_order_status_terminals() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Pending));
        assert!(OrderStatus::ReadyForDelivery.can_transition_to(OrderStatus::Delivered));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn test_order_open_for_production() {
        assert!(OrderStatus::Pending.is_open_for_production());
        assert!(OrderStatus::InProduction.is_open_for_production());
        assert!(!OrderStatus::ReadyForDelivery.is_open_for_production());
        assert!(!OrderStatus::Delivered.is_open_for_production());
        assert!(!OrderStatus::Cancelled.is_open_for_production());
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&SaleStatus::AwaitingPayment).unwrap(),
            "\"awaiting_payment\""
        );
        assert_eq!(
            serde_json::to_string(&OrderStatus::ReadyForDelivery).unwrap(),
            "\"ready_for_delivery\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Cash).unwrap(),
            "\"cash\""
        );
    }

    #[test]
    fn test_material_alert() {
        let material = Material {
            id: "m-1".to_string(),
            name: "Soy wax".to_string(),
            unit: "kg".to_string(),
            current_stock: 5,
            alert_threshold: 5,
            cost_per_unit_cents: 800,
        };
        assert!(material.is_below_alert());
    }
}
