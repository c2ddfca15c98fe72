//! # Sale Transaction
//!
//! Create, update, and delete flows for sales, coordinating the stock
//! ledger and jar-credit debits under a status-dependent policy.
//!
//! ## Stock Policy by Transition
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 When Does a Sale Touch Stock?                           │
//! │                                                                         │
//! │  CREATE   status != Cancelled, not from_order  ──► consume             │
//! │           status == Cancelled or from_order    ──► nothing             │
//! │                                                                         │
//! │  UPDATE   from_order                            ──► never anything     │
//! │           non-Cancelled → Cancelled             ──► release            │
//! │           Cancelled → non-Cancelled             ──► consume (re-check) │
//! │           other transitions                     ──► nothing            │
//! │                                                                         │
//! │  DELETE   Paid, not from_order                  ──► release            │
//! │           anything else                         ──► nothing            │
//! │                                                                         │
//! │  from_order sales are produced to order; production consumed           │
//! │  materials through its own workflow, so deducting finished-goods       │
//! │  stock here would double-count.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Jar credits are debited once, at create time, when the committing
//! status is not Cancelled. Status updates never re-touch the balance.

use candela_core::discount::{self, PriceBreakdown};
use candela_core::jar::{self, JarAllocation};
use candela_core::types::{PaymentMethod, Sale, SaleItem, SaleStatus};
use candela_core::validation::validate_quantity;
use candela_core::{CoreError, DiscountRate, Money};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::clock::Clock;
use crate::engine::Engine;
use crate::error::EngineResult;
use crate::stock;
use crate::store::EngineStore;

// =============================================================================
// Input DTO
// =============================================================================

/// One requested line on a new sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSaleLine {
    pub product_id: String,
    pub quantity: i64,
}

/// Input for [`Engine::create_sale`].
///
/// Product names and unit prices are NOT accepted here; they are
/// snapshotted from the product store at commit time so a sale can never
/// be created against stale prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSale {
    pub customer_id: String,
    pub lines: Vec<NewSaleLine>,
    pub status: SaleStatus,
    /// Required when status is Paid.
    pub payment_method: Option<PaymentMethod>,
    /// Ad-hoc discount as entered on the form, in percent. Validated to
    /// [0, 100]; stacked on top of any birthday discount.
    pub additional_discount_percent: f64,
    pub shipping_cents: i64,
    pub notes: Option<String>,
}

// =============================================================================
// Sale Operations
// =============================================================================

impl<S: EngineStore, C: Clock> Engine<S, C> {
    /// Creates a sale.
    ///
    /// ## Flow
    /// 1. Validate lines (non-empty, positive quantities)
    /// 2. Snapshot items from the product store (frozen name + price)
    /// 3. Determine the birthday rate from the clock, preview the jar
    ///    allocation, price the sale
    /// 4. Consume stock (unless Cancelled) - any shortfall aborts the
    ///    whole creation with nothing mutated and nothing persisted
    /// 5. Debit the customer's jar credits (unless Cancelled)
    /// 6. Persist and return the sale
    pub fn create_sale(&mut self, input: NewSale) -> EngineResult<Sale> {
        debug!(customer_id = %input.customer_id, lines = input.lines.len(), "create_sale");

        if input.lines.is_empty() {
            return Err(CoreError::EmptySale.into());
        }
        for line in &input.lines {
            validate_quantity(line.quantity)?;
        }
        if input.status == SaleStatus::Paid && input.payment_method.is_none() {
            return Err(CoreError::PaymentMethodRequired.into());
        }

        let customer = self.store.customer(&input.customer_id)?;
        let settings = self.store.settings()?;

        let mut items = Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            let product = self.store.product(&line.product_id)?;
            items.push(SaleItem::from_product(&product, line.quantity));
        }

        let additional = DiscountRate::try_from_percent(input.additional_discount_percent)?;
        let birthday = discount::birthday_rate(&customer, &settings, self.clock.today());
        let allocation = jar::allocate(&customer, &items, settings.jar_discount_per_unit());

        let breakdown = discount::price_sale(
            &items,
            birthday,
            additional,
            allocation.cash(),
            Money::from_cents(input.shipping_cents),
        )?;

        self.commit_sale(
            input.customer_id,
            items,
            breakdown,
            allocation,
            input.status,
            input.payment_method,
            false,
            input.notes,
        )
    }

    /// Changes a sale's status.
    ///
    /// Items and customer are fixed at the original commit; only the
    /// status (and, on Paid, the payment method) move. Stock follows the
    /// policy table in the module docs. A failed stock re-check on
    /// un-cancel leaves the sale Cancelled and stock untouched.
    pub fn update_sale_status(
        &mut self,
        sale_id: &str,
        new_status: SaleStatus,
        payment_method: Option<PaymentMethod>,
    ) -> EngineResult<Sale> {
        debug!(sale_id, ?new_status, "update_sale_status");

        let mut sale = self.store.sale(sale_id)?;
        let current = sale.status;

        if !current.can_transition_to(new_status) {
            return Err(CoreError::InvalidStatusTransition {
                from: format!("{current:?}"),
                to: format!("{new_status:?}"),
            }
            .into());
        }
        if new_status == SaleStatus::Paid
            && payment_method.is_none()
            && sale.payment_method.is_none()
        {
            return Err(CoreError::PaymentMethodRequired.into());
        }

        if !sale.from_order {
            if current != SaleStatus::Cancelled && new_status == SaleStatus::Cancelled {
                stock::release(&mut self.store, &sale.items)?;
            } else if current == SaleStatus::Cancelled && new_status != SaleStatus::Cancelled {
                // Stock may have been sold elsewhere since cancellation
                stock::consume(&mut self.store, &sale.items)?;
            }
        }

        sale.status = new_status;
        if let Some(method) = payment_method {
            sale.payment_method = Some(method);
        }
        self.store.update_sale(sale.clone())?;

        info!(sale_id, from = ?current, to = ?new_status, "sale status changed");
        Ok(sale)
    }

    /// Deletes a sale.
    ///
    /// A Paid retail sale returns its quantities to stock first. Every
    /// other status (and every from_order sale) is removed without stock
    /// mutation; callers wanting restoration for an open sale cancel it
    /// first.
    pub fn delete_sale(&mut self, sale_id: &str) -> EngineResult<()> {
        debug!(sale_id, "delete_sale");

        let sale = self.store.sale(sale_id)?;
        if sale.status == SaleStatus::Paid && !sale.from_order {
            stock::release(&mut self.store, &sale.items)?;
        }
        self.store.remove_sale(sale_id)?;

        info!(sale_id, status = ?sale.status, "sale deleted");
        Ok(())
    }

    /// Shared commit tail for retail sales and order conversions.
    ///
    /// Stock and credits move before the record is persisted; any failure
    /// on the way out means nothing was written.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn commit_sale(
        &mut self,
        customer_id: String,
        items: Vec<SaleItem>,
        breakdown: PriceBreakdown,
        allocation: JarAllocation,
        status: SaleStatus,
        payment_method: Option<PaymentMethod>,
        from_order: bool,
        notes: Option<String>,
    ) -> EngineResult<Sale> {
        if status != SaleStatus::Cancelled && !from_order {
            stock::consume(&mut self.store, &items)?;
        }

        if allocation.credits_used > 0 && status != SaleStatus::Cancelled {
            let customer = self.store.customer(&customer_id)?;
            let new_balance = (customer.jar_credits - allocation.credits_used).max(0);
            self.store.update_jar_credits(&customer_id, new_balance)?;
        }

        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            customer_id,
            items,
            subtotal_cents: breakdown.subtotal_cents,
            discount_bps: breakdown.discount_bps,
            discount_cents: breakdown.discount_cents,
            jar_credits_used: allocation.credits_used,
            jar_discount_cents: breakdown.jar_discount_cents,
            shipping_cents: breakdown.shipping_cents,
            total_cents: breakdown.total_cents,
            status,
            payment_method,
            sale_date: self.clock.today(),
            from_order,
            notes,
        };
        self.store.insert_sale(sale.clone())?;

        info!(
            sale_id = %sale.id,
            total_cents = sale.total_cents,
            ?status,
            from_order,
            "sale committed"
        );
        Ok(sale)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::EngineError;
    use crate::store::memory::MemoryStore;
    use crate::store::{CustomerStore, ProductStore, SaleStore};
    use candela_core::types::{Customer, Product, Settings};
    use chrono::NaiveDate;

    const MARCH_14: &str = "2026-03-14";

    fn product(id: &str, price_cents: i64, quantity: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            category: None,
            unit_price_cents: price_cents,
            quantity,
            bill_of_materials: Vec::new(),
            price_history: Vec::new(),
        }
    }

    fn customer(id: &str, birth_month: Option<u32>, jar_credits: i64) -> Customer {
        Customer {
            id: id.to_string(),
            name: format!("Customer {id}"),
            birth_month,
            birth_day: None,
            jar_credits,
        }
    }

    fn engine() -> Engine<MemoryStore, FixedClock> {
        // Run tests with RUST_LOG=debug to watch the flows
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();

        let mut store = MemoryStore::new(Settings {
            low_stock_threshold: 5,
            birthday_discount_bps: 1000,
            jar_discount_per_unit_cents: 500,
        });
        store.add_product(product("a", 2500, 5));
        store.add_product(product("b", 1000, 4));
        store.add_customer(customer("c-1", None, 0));
        store.add_customer(customer("c-march", Some(3), 0));
        store.add_customer(customer("c-jars", None, 2));
        let date: NaiveDate = MARCH_14.parse().unwrap();
        Engine::with_clock(store, FixedClock::on(date))
    }

    fn new_sale(customer_id: &str, lines: &[(&str, i64)], status: SaleStatus) -> NewSale {
        NewSale {
            customer_id: customer_id.to_string(),
            lines: lines
                .iter()
                .map(|&(product_id, quantity)| NewSaleLine {
                    product_id: product_id.to_string(),
                    quantity,
                })
                .collect(),
            status,
            payment_method: None,
            additional_discount_percent: 0.0,
            shipping_cents: 0,
            notes: None,
        }
    }

    #[test]
    fn test_create_deducts_stock_and_cancel_restores_it() {
        let mut engine = engine();

        let sale = engine
            .create_sale(new_sale("c-1", &[("a", 3)], SaleStatus::Pending))
            .unwrap();
        assert_eq!(engine.store().product("a").unwrap().quantity, 2);
        assert_eq!(sale.subtotal_cents, 7500);
        assert_eq!(sale.sale_date, MARCH_14.parse::<NaiveDate>().unwrap());

        engine
            .update_sale_status(&sale.id, SaleStatus::Cancelled, None)
            .unwrap();
        assert_eq!(engine.store().product("a").unwrap().quantity, 5);
    }

    #[test]
    fn test_create_cancelled_leaves_stock_alone() {
        let mut engine = engine();
        engine
            .create_sale(new_sale("c-1", &[("a", 3)], SaleStatus::Cancelled))
            .unwrap();
        assert_eq!(engine.store().product("a").unwrap().quantity, 5);
    }

    #[test]
    fn test_insufficient_stock_aborts_whole_creation() {
        let mut engine = engine();

        // Line 2 of 3 is short (b has 4); nothing may change anywhere
        let err = engine
            .create_sale(new_sale(
                "c-1",
                &[("a", 2), ("b", 5), ("a", 1)],
                SaleStatus::Pending,
            ))
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::InsufficientStock { ref product_id, available: 4, requested: 5 }
                if product_id == "b"
        ));

        assert_eq!(engine.store().product("a").unwrap().quantity, 5);
        assert_eq!(engine.store().product("b").unwrap().quantity, 4);
        assert!(engine.store().sales().unwrap().is_empty());
    }

    #[test]
    fn test_stock_conservation_across_lifecycle() {
        let mut engine = engine();

        let s1 = engine
            .create_sale(new_sale("c-1", &[("a", 2)], SaleStatus::Pending))
            .unwrap();
        let s2 = engine
            .create_sale(new_sale("c-1", &[("a", 1), ("b", 3)], SaleStatus::AwaitingPayment))
            .unwrap();
        engine
            .update_sale_status(&s2.id, SaleStatus::Paid, Some(PaymentMethod::Cash))
            .unwrap();
        engine
            .update_sale_status(&s1.id, SaleStatus::Cancelled, None)
            .unwrap();

        // Active (non-cancelled) sales hold a:1, b:3
        assert_eq!(engine.store().product("a").unwrap().quantity, 4);
        assert_eq!(engine.store().product("b").unwrap().quantity, 1);

        // Deleting the Paid sale releases its quantities
        engine.delete_sale(&s2.id).unwrap();
        assert_eq!(engine.store().product("a").unwrap().quantity, 5);
        assert_eq!(engine.store().product("b").unwrap().quantity, 4);
    }

    #[test]
    fn test_uncancel_rechecks_stock() {
        let mut engine = engine();

        let sale = engine
            .create_sale(new_sale("c-1", &[("a", 4)], SaleStatus::Pending))
            .unwrap();
        engine
            .update_sale_status(&sale.id, SaleStatus::Cancelled, None)
            .unwrap();
        assert_eq!(engine.store().product("a").unwrap().quantity, 5);

        // Someone else buys 3 of "a" in the meantime
        engine
            .create_sale(new_sale("c-1", &[("a", 3)], SaleStatus::Pending))
            .unwrap();

        // Un-cancelling needs 4 but only 2 remain
        let err = engine
            .update_sale_status(&sale.id, SaleStatus::Pending, None)
            .unwrap_err();
        assert!(matches!(err, EngineError::InsufficientStock { .. }));

        // Sale stayed Cancelled, stock untouched
        assert_eq!(
            engine.store().sale(&sale.id).unwrap().status,
            SaleStatus::Cancelled
        );
        assert_eq!(engine.store().product("a").unwrap().quantity, 2);
    }

    #[test]
    fn test_paid_is_terminal() {
        let mut engine = engine();
        let sale = engine
            .create_sale(NewSale {
                payment_method: Some(PaymentMethod::Card),
                ..new_sale("c-1", &[("a", 1)], SaleStatus::Paid)
            })
            .unwrap();

        let err = engine
            .update_sale_status(&sale.id, SaleStatus::Pending, None)
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::InvalidStatusTransition { .. })
        ));
    }

    #[test]
    fn test_paid_requires_payment_method() {
        let mut engine = engine();

        // At creation
        let err = engine
            .create_sale(new_sale("c-1", &[("a", 1)], SaleStatus::Paid))
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::PaymentMethodRequired)
        ));

        // At transition
        let sale = engine
            .create_sale(new_sale("c-1", &[("a", 1)], SaleStatus::Pending))
            .unwrap();
        let err = engine
            .update_sale_status(&sale.id, SaleStatus::Paid, None)
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::PaymentMethodRequired)
        ));

        let sale = engine
            .update_sale_status(&sale.id, SaleStatus::Paid, Some(PaymentMethod::Transfer))
            .unwrap();
        assert_eq!(sale.payment_method, Some(PaymentMethod::Transfer));
    }

    #[test]
    fn test_birthday_discount_applies_from_clock() {
        let mut engine = engine();

        // March customer, clock pinned to March 14: 10% birthday discount
        let sale = engine
            .create_sale(new_sale("c-march", &[("a", 4)], SaleStatus::Pending))
            .unwrap();
        assert_eq!(sale.subtotal_cents, 10000);
        assert_eq!(sale.discount_bps, 1000);
        assert_eq!(sale.discount_cents, 1000);
        assert_eq!(sale.total_cents, 9000);

        // Non-March customer gets nothing
        let sale = engine
            .create_sale(new_sale("c-1", &[("b", 1)], SaleStatus::Pending))
            .unwrap();
        assert_eq!(sale.discount_bps, 0);
    }

    #[test]
    fn test_discounts_stack_with_jar_and_shipping() {
        let mut engine = engine();

        // March-birthday customer with one jar credit on balance
        engine.store_mut().add_customer(customer("c-both", Some(3), 1));

        let sale = engine
            .create_sale(NewSale {
                additional_discount_percent: 15.0,
                shipping_cents: 800,
                ..new_sale("c-both", &[("a", 4)], SaleStatus::Pending)
            })
            .unwrap();

        assert_eq!(sale.subtotal_cents, 10000);
        assert_eq!(sale.discount_bps, 2500);
        assert_eq!(sale.discount_cents, 2500);
        assert_eq!(sale.jar_credits_used, 1);
        assert_eq!(sale.jar_discount_cents, 500);
        assert_eq!(sale.shipping_cents, 800);
        assert_eq!(sale.total_cents, 10000 - 2500 - 500 + 800);
    }

    #[test]
    fn test_invalid_discount_is_rejected_not_clamped() {
        let mut engine = engine();
        let err = engine
            .create_sale(NewSale {
                additional_discount_percent: 120.0,
                ..new_sale("c-1", &[("a", 1)], SaleStatus::Pending)
            })
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::InvalidDiscount { value }) if value == 120.0
        ));
        assert!(engine.store().sales().unwrap().is_empty());
    }

    #[test]
    fn test_jar_credits_debited_on_commit() {
        let mut engine = engine();

        // 2 credits, 3 units sold: both credits consumed
        let sale = engine
            .create_sale(new_sale("c-jars", &[("b", 3)], SaleStatus::Pending))
            .unwrap();
        assert_eq!(sale.jar_credits_used, 2);
        assert_eq!(sale.jar_discount_cents, 1000);
        assert_eq!(engine.store().customer("c-jars").unwrap().jar_credits, 0);
    }

    #[test]
    fn test_jar_credits_not_debited_on_cancelled_creation() {
        let mut engine = engine();
        engine
            .create_sale(new_sale("c-jars", &[("b", 3)], SaleStatus::Cancelled))
            .unwrap();
        assert_eq!(engine.store().customer("c-jars").unwrap().jar_credits, 2);
    }

    #[test]
    fn test_jar_credits_untouched_by_insufficient_stock() {
        let mut engine = engine();
        let err = engine
            .create_sale(new_sale("c-jars", &[("b", 99)], SaleStatus::Pending))
            .unwrap_err();
        assert!(matches!(err, EngineError::InsufficientStock { .. }));
        assert_eq!(engine.store().customer("c-jars").unwrap().jar_credits, 2);
    }

    #[test]
    fn test_delete_of_open_sale_keeps_stock() {
        let mut engine = engine();
        let sale = engine
            .create_sale(new_sale("c-1", &[("a", 2)], SaleStatus::Pending))
            .unwrap();
        engine.delete_sale(&sale.id).unwrap();

        // Reference behavior: only Paid sales release on delete
        assert_eq!(engine.store().product("a").unwrap().quantity, 3);
        assert!(engine.store().sales().unwrap().is_empty());
    }

    #[test]
    fn test_empty_sale_rejected() {
        let mut engine = engine();
        let err = engine
            .create_sale(new_sale("c-1", &[], SaleStatus::Pending))
            .unwrap_err();
        assert!(matches!(err, EngineError::Core(CoreError::EmptySale)));
    }

    #[test]
    fn test_unknown_customer_and_product() {
        let mut engine = engine();

        assert!(matches!(
            engine
                .create_sale(new_sale("ghost", &[("a", 1)], SaleStatus::Pending))
                .unwrap_err(),
            EngineError::CustomerNotFound(_)
        ));
        assert!(matches!(
            engine
                .create_sale(new_sale("c-1", &[("ghost", 1)], SaleStatus::Pending))
                .unwrap_err(),
            EngineError::ProductNotFound(_)
        ));
    }

    #[test]
    fn test_items_snapshot_survives_price_change() {
        let mut engine = engine();
        let sale = engine
            .create_sale(new_sale("c-1", &[("a", 1)], SaleStatus::Pending))
            .unwrap();

        engine
            .change_product_price("a", Money::from_cents(9999), "repriced")
            .unwrap();

        let stored = engine.store().sale(&sale.id).unwrap();
        assert_eq!(stored.items[0].unit_price_cents, 2500);
    }
}
