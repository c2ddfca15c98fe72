//! # Stock Ledger
//!
//! The authoritative path for every finished-goods quantity change.
//!
//! ## All-or-Nothing Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  consume([A×3, B×2, A×1])                                              │
//! │                                                                         │
//! │  Phase 1: aggregate        A: 4, B: 2                                  │
//! │  Phase 2: check ALL        A on hand? B on hand?  ── any short ──► Err │
//! │  Phase 3: deduct ALL       A -= 4, B -= 2                              │
//! │                                                                         │
//! │  A failed check leaves every quantity untouched. There is no          │
//! │  rollback because nothing was applied before the last check passed.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Duplicate lines for the same product are aggregated before the check;
//! two lines that individually fit must not jointly drive a quantity
//! negative.
//!
//! Checks read the store's CURRENT quantity at call time, never a caller
//! snapshot, so an external change between pricing and commit is caught.

use candela_core::types::SaleItem;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::store::ProductStore;

/// Adds a signed delta to one product's on-hand quantity.
///
/// Returns the new quantity. This is the raw ledger primitive; sale flows
/// go through [`consume`] / [`release`] which handle multi-line
/// aggregation and checking.
pub fn apply(products: &mut impl ProductStore, product_id: &str, delta: i64) -> EngineResult<i64> {
    let new_quantity = products.apply_quantity_delta(product_id, delta)?;
    debug!(product_id, delta, new_quantity, "stock delta applied");
    Ok(new_quantity)
}

/// Checks that every line is coverable by current stock. Mutates nothing.
///
/// Requested quantities are aggregated per product before checking. The
/// first shortfall (in line order) fails the whole call with
/// `InsufficientStock`.
pub fn reserve(products: &impl ProductStore, items: &[SaleItem]) -> EngineResult<()> {
    for (product_id, requested) in aggregate(items) {
        let product = products.product(product_id)?;
        if product.quantity < requested {
            return Err(EngineError::InsufficientStock {
                product_id: product_id.to_string(),
                available: product.quantity,
                requested,
            });
        }
    }
    Ok(())
}

/// Deducts every line from stock, all-or-nothing.
///
/// Runs [`reserve`] first; only when every product passes does any
/// quantity change.
pub fn consume(products: &mut impl ProductStore, items: &[SaleItem]) -> EngineResult<()> {
    reserve(products, items)?;
    for (product_id, quantity) in aggregate(items) {
        apply(products, product_id, -quantity)?;
    }
    Ok(())
}

/// Adds every line back to stock.
///
/// The inverse of [`consume`]. No upper bound is validated; releasing is
/// always safe. Fails only when a product id no longer exists.
pub fn release(products: &mut impl ProductStore, items: &[SaleItem]) -> EngineResult<()> {
    for (product_id, quantity) in aggregate(items) {
        apply(products, product_id, quantity)?;
    }
    Ok(())
}

/// Sums quantities per product, preserving first-seen line order.
fn aggregate(items: &[SaleItem]) -> Vec<(&str, i64)> {
    let mut totals: Vec<(&str, i64)> = Vec::new();
    for item in items {
        match totals.iter_mut().find(|(id, _)| *id == item.product_id) {
            Some((_, qty)) => *qty += item.quantity,
            None => totals.push((item.product_id.as_str(), item.quantity)),
        }
    }
    totals
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use candela_core::types::{Product, Settings};

    fn store_with(stocks: &[(&str, i64)]) -> MemoryStore {
        let mut store = MemoryStore::new(Settings {
            low_stock_threshold: 5,
            birthday_discount_bps: 0,
            jar_discount_per_unit_cents: 0,
        });
        for &(id, quantity) in stocks {
            store.add_product(Product {
                id: id.to_string(),
                name: format!("Product {id}"),
                category: None,
                unit_price_cents: 1000,
                quantity,
                bill_of_materials: Vec::new(),
                price_history: Vec::new(),
            });
        }
        store
    }

    fn item(product_id: &str, quantity: i64) -> SaleItem {
        SaleItem {
            product_id: product_id.to_string(),
            product_name: format!("Product {product_id}"),
            quantity,
            unit_price_cents: 1000,
            line_total_cents: 1000 * quantity,
        }
    }

    #[test]
    fn test_consume_deducts_all_lines() {
        let mut store = store_with(&[("a", 5), ("b", 4)]);

        consume(&mut store, &[item("a", 3), item("b", 2)]).unwrap();

        assert_eq!(store.product("a").unwrap().quantity, 2);
        assert_eq!(store.product("b").unwrap().quantity, 2);
    }

    #[test]
    fn test_failed_check_mutates_nothing() {
        let mut store = store_with(&[("a", 5), ("b", 1), ("c", 9)]);

        // Middle line is short; every quantity must stay untouched
        let err = consume(&mut store, &[item("a", 3), item("b", 2), item("c", 1)]).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InsufficientStock { ref product_id, available: 1, requested: 2 }
                if product_id == "b"
        ));

        assert_eq!(store.product("a").unwrap().quantity, 5);
        assert_eq!(store.product("b").unwrap().quantity, 1);
        assert_eq!(store.product("c").unwrap().quantity, 9);
    }

    #[test]
    fn test_duplicate_lines_are_aggregated() {
        let mut store = store_with(&[("a", 5)]);

        // 3 + 3 on one product with 5 on hand: individually fine, jointly
        // short
        let err = consume(&mut store, &[item("a", 3), item("a", 3)]).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InsufficientStock { available: 5, requested: 6, .. }
        ));
        assert_eq!(store.product("a").unwrap().quantity, 5);

        consume(&mut store, &[item("a", 3), item("a", 2)]).unwrap();
        assert_eq!(store.product("a").unwrap().quantity, 0);
    }

    #[test]
    fn test_release_is_unbounded() {
        let mut store = store_with(&[("a", 2)]);

        release(&mut store, &[item("a", 50)]).unwrap();
        assert_eq!(store.product("a").unwrap().quantity, 52);
    }

    #[test]
    fn test_exact_fit_is_allowed() {
        let mut store = store_with(&[("a", 3)]);
        consume(&mut store, &[item("a", 3)]).unwrap();
        assert_eq!(store.product("a").unwrap().quantity, 0);
    }

    #[test]
    fn test_unknown_product_fails_check() {
        let store = store_with(&[]);
        assert!(matches!(
            reserve(&store, &[item("ghost", 1)]).unwrap_err(),
            EngineError::ProductNotFound(_)
        ));
    }
}
