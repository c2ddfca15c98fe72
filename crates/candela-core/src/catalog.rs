//! # Catalog Queries
//!
//! Pure read-only queries over catalog snapshots.
//!
//! These exist so the UI can decide whether to prompt ("this price change
//! affects 12 products, continue?") without the engine ever owning a
//! confirm dialog. The engine answers questions; the host talks to humans.

use crate::types::{Material, Product};

/// Products a category-wide price change would affect.
///
/// Matching is exact on the category label; products without a category
/// never match.
pub fn products_in_category<'a>(products: &'a [Product], category: &str) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|p| p.category.as_deref() == Some(category))
        .collect()
}

/// Products at or below the configured low-stock threshold.
pub fn low_stock_products(products: &[Product], threshold: i64) -> Vec<&Product> {
    products.iter().filter(|p| p.quantity <= threshold).collect()
}

/// Materials at or below their own alert threshold.
pub fn materials_below_alert(materials: &[Material]) -> Vec<&Material> {
    materials.iter().filter(|m| m.is_below_alert()).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
