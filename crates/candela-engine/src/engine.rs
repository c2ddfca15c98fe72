//! # Engine
//!
//! The coordination point for every mutating flow: holds the injected
//! store and clock, and exposes the operations the host application calls.
//!
//! ## Operation Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Engine Operations                                  │
//! │                                                                         │
//! │  create_sale          price + stock consume + jar debit + persist     │
//! │  update_sale_status   status machine + stock release/re-consume       │
//! │  delete_sale          stock release for paid retail sales             │
//! │  deliver_order        order → paid from_order sale (no stock touch)   │
//! │  update_order_status  order machine, delegates delivery               │
//! │  set_installment_paid prefix-invariant pay/unpay round-trip           │
//! │  change_product_price append-only price history                       │
//! │                                                                         │
//! │  Pure math (pricing, allocation, planning) lives in candela-core       │
//! │  and needs no Engine at all.                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use candela_core::installment::InstallmentPlan;
use candela_core::types::{PriceChange, Product};
use candela_core::validation::validate_price_cents;
use candela_core::Money;
use tracing::info;

use crate::clock::{Clock, SystemClock};
use crate::error::EngineResult;
use crate::store::EngineStore;

/// The lifecycle engine over an injected store and clock.
///
/// ## Usage
/// ```rust,ignore
/// let store = MemoryStore::new(settings);
/// let mut engine = Engine::new(store);
///
/// let sale = engine.create_sale(input)?;
/// engine.update_sale_status(&sale.id, SaleStatus::Paid, Some(PaymentMethod::Cash))?;
/// ```
#[derive(Debug)]
pub struct Engine<S: EngineStore, C: Clock = SystemClock> {
    pub(crate) store: S,
    pub(crate) clock: C,
}

impl<S: EngineStore> Engine<S, SystemClock> {
    /// Creates an engine on the system clock.
    pub fn new(store: S) -> Self {
        Engine {
            store,
            clock: SystemClock,
        }
    }
}

impl<S: EngineStore, C: Clock> Engine<S, C> {
    /// Creates an engine with an explicit clock (tests pin time here).
    pub fn with_clock(store: S, clock: C) -> Self {
        Engine { store, clock }
    }

    /// Read access to the injected store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Write access to the injected store, for host-side CRUD the engine
    /// does not mediate.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Changes a product's unit price, recording the change in its
    /// append-only history.
    ///
    /// The timestamp comes from the engine clock, so history stays
    /// monotonic as long as the clock does.
    pub fn change_product_price(
        &mut self,
        product_id: &str,
        new_price: Money,
        reason: impl Into<String>,
    ) -> EngineResult<Product> {
        validate_price_cents(new_price.cents())?;

        let entry = PriceChange {
            price_cents: new_price.cents(),
            changed_at: self.clock.now(),
            reason: reason.into(),
        };
        self.store.append_price_history(product_id, entry)?;

        info!(product_id, price_cents = new_price.cents(), "product price changed");
        self.store.product(product_id)
    }

    /// Marks an installment paid or unpaid, enforcing the sequential
    /// prefix rules, and persists the plan.
    pub fn set_installment_paid(
        &mut self,
        plan_id: &str,
        number: u32,
        paid: bool,
    ) -> EngineResult<InstallmentPlan> {
        let mut plan = self.store.plan(plan_id)?;
        plan.set_paid(number, paid, self.clock.today())?;
        self.store.upsert_plan(plan.clone())?;

        info!(plan_id, number, paid, "installment payment updated");
        Ok(plan)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
