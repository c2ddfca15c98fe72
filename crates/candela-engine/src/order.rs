//! # Order-to-Sale Converter
//!
//! Promotes a delivered make-to-order Order into a recognized Sale.
//!
//! ## Why Delivered Orders Skip the Stock Ledger
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Retail sale:   candle leaves the SHELF      → stock ledger deducts    │
//! │  Order:         candle is MADE for the order → production consumed     │
//! │                                                 materials already      │
//! │                                                                         │
//! │  The sale created at delivery carries from_order = true, which the     │
//! │  whole sale lifecycle honors: create, update, and delete of such a     │
//! │  sale never move finished-goods stock. Deducting here would count      │
//! │  the same candle twice.                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine does not persist orders; the host owns order CRUD and passes
//! the order in. The returned updated Order is the host's to store.

use candela_core::discount::PriceBreakdown;
use candela_core::jar::JarAllocation;
use candela_core::types::{Order, OrderStatus, PaymentMethod, Sale, SaleStatus};
use candela_core::CoreError;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::engine::Engine;
use crate::error::EngineResult;
use crate::store::EngineStore;

impl<S: EngineStore, C: Clock> Engine<S, C> {
    /// Delivers an order, creating its Sale.
    ///
    /// Runs exactly once per order: only a non-terminal order can reach
    /// Delivered, and Delivered accepts no further transitions.
    ///
    /// ## Effects
    /// - The returned Order copy is Delivered, stamped with today's date
    ///   and the resolved payment method
    /// - A Sale is persisted: status Paid, `from_order = true`, items and
    ///   customer copied, notes annotated with the order id
    /// - Finished-goods stock is NOT touched, and no jar credits are
    ///   allocated or debited
    ///
    /// ## Errors
    /// - `InvalidStatusTransition` for Delivered or Cancelled orders
    /// - `PaymentMethodRequired` when neither the order nor the call
    ///   carries a method (delivery implies payment received)
    pub fn deliver_order(
        &mut self,
        order: &Order,
        payment_method: Option<PaymentMethod>,
    ) -> EngineResult<(Order, Sale)> {
        debug!(order_id = %order.id, "deliver_order");

        if !order.status.can_transition_to(OrderStatus::Delivered) {
            return Err(CoreError::InvalidStatusTransition {
                from: format!("{:?}", order.status),
                to: format!("{:?}", OrderStatus::Delivered),
            }
            .into());
        }

        let method = payment_method
            .or(order.payment_method)
            .ok_or(CoreError::PaymentMethodRequired)?;

        let subtotal_cents = order.subtotal().cents();
        let breakdown = PriceBreakdown {
            subtotal_cents,
            discount_bps: 0,
            discount_cents: 0,
            jar_discount_cents: 0,
            shipping_cents: 0,
            total_cents: subtotal_cents,
        };

        let notes = match &order.notes {
            Some(existing) => format!("{existing} (from order {})", order.id),
            None => format!("From order {}", order.id),
        };

        let sale = self.commit_sale(
            order.customer_id.clone(),
            order.items.clone(),
            breakdown,
            JarAllocation::none(),
            SaleStatus::Paid,
            Some(method),
            true,
            Some(notes),
        )?;

        let mut delivered = order.clone();
        delivered.status = OrderStatus::Delivered;
        delivered.delivered_at = Some(self.clock.today());
        delivered.payment_method = Some(method);

        info!(order_id = %order.id, sale_id = %sale.id, "order delivered");
        Ok((delivered, sale))
    }

    /// Changes an order's status.
    ///
    /// A transition into Delivered delegates to [`Engine::deliver_order`]
    /// and returns the created Sale; every other allowed transition
    /// returns the updated order alone. Terminal statuses (Delivered,
    /// Cancelled) accept nothing.
    pub fn update_order_status(
        &mut self,
        order: &Order,
        new_status: OrderStatus,
        payment_method: Option<PaymentMethod>,
    ) -> EngineResult<(Order, Option<Sale>)> {
        if new_status == OrderStatus::Delivered {
            let (delivered, sale) = self.deliver_order(order, payment_method)?;
            return Ok((delivered, Some(sale)));
        }

        if !order.status.can_transition_to(new_status) {
            return Err(CoreError::InvalidStatusTransition {
                from: format!("{:?}", order.status),
                to: format!("{new_status:?}"),
            }
            .into());
        }

        let mut updated = order.clone();
        updated.status = new_status;

        info!(order_id = %order.id, from = ?order.status, to = ?new_status, "order status changed");
        Ok((updated, None))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
