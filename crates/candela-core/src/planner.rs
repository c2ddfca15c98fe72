//! # Production Requirement Planner
//!
//! Pure computation of what to produce and which materials that consumes.
//! No persisted mutation; the output is a report structure for the UI and
//! for printing.
//!
//! ## Planning Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Production Requirement Planning                        │
//! │                                                                         │
//! │  open orders (Pending / InProduction)                                  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  per product: total = Σ open order qty + manual top-up                 │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  per BOM line: needed = per-unit qty × total                           │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  per material (aggregated): deficit = available - needed               │
//! │                             (negative = shortage to reorder)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The auto-fill mode tops every product up to the configured low-stock
//! threshold, skipping products matched by a caller-supplied exclusion
//! predicate (make-to-order lines that should never be produced to stock).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{Material, Order, Product};

// =============================================================================
// Manual Targets
// =============================================================================

/// Manual per-product production top-ups, keyed by product id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ManualTargets(HashMap<String, i64>);

impl ManualTargets {
    /// Creates an empty target set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the manual quantity for a product. Zero removes the entry.
    pub fn set(&mut self, product_id: impl Into<String>, quantity: i64) {
        let id = product_id.into();
        if quantity <= 0 {
            self.0.remove(&id);
        } else {
            self.0.insert(id, quantity);
        }
    }

    /// Returns the manual quantity for a product (0 when unset).
    pub fn get(&self, product_id: &str) -> i64 {
        self.0.get(product_id).copied().unwrap_or(0)
    }

    /// Builds targets that top every product up to the low-stock threshold.
    ///
    /// For each product not matched by `exclude`, the target is
    /// `max(0, threshold - current stock)`. The predicate comes from
    /// configuration (typically a name pattern for made-to-order-only
    /// lines), not from hardcoded rules here.
    pub fn auto_fill<F>(products: &[Product], low_stock_threshold: i64, exclude: F) -> Self
    where
        F: Fn(&Product) -> bool,
    {
        let mut targets = ManualTargets::new();
        for product in products {
            if exclude(product) {
                continue;
            }
            let top_up = (low_stock_threshold - product.quantity).max(0);
            targets.set(product.id.clone(), top_up);
        }
        targets
    }
}

// =============================================================================
// Plan Report Types
// =============================================================================

/// One material requirement within a single product's plan line.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MaterialRequirement {
    pub material_id: String,
    pub material_name: String,
    pub unit: String,
    /// Per-unit BOM quantity × planned production quantity.
    pub quantity_needed: i64,
    /// quantity_needed × the BOM line's cost per unit.
    pub cost_cents: i64,
}

/// Planned production for a single product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductPlan {
    pub product_id: String,
    pub product_name: String,
    /// Quantity demanded by open orders (Pending / InProduction).
    pub open_order_quantity: i64,
    /// Manual top-up supplied by the caller (possibly auto-filled).
    pub manual_quantity: i64,
    /// open_order_quantity + manual_quantity.
    pub total_to_produce: i64,
    pub requirements: Vec<MaterialRequirement>,
}

/// Aggregated demand for one material across all planned products.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MaterialDemand {
    pub material_id: String,
    pub material_name: String,
    pub unit: String,
    /// Total needed across every product sharing this material.
    pub quantity_needed: i64,
    /// Current material stock.
    pub available: i64,
    /// available - needed. Negative means a shortage to reorder; the
    /// planner flags it, nothing more.
    pub deficit: i64,
    /// Total cost of the needed quantity.
    pub cost_cents: i64,
}

/// The full production requirement report.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductionPlan {
    /// Per-product lines; products with nothing to produce are omitted.
    pub products: Vec<ProductPlan>,
    /// Per-material aggregate, in the caller's material order.
    pub materials: Vec<MaterialDemand>,
}

// =============================================================================
// Planning
// =============================================================================

/// Computes the production requirement report.
///
/// ## Arguments
/// * `products` - the catalog, including each product's bill of materials
/// * `orders` - all orders; only Pending / InProduction quantities count
/// * `materials` - material stock snapshot; output aggregate follows this
///   order
/// * `targets` - manual top-ups (see [`ManualTargets::auto_fill`])
///
/// ## Errors
/// `MaterialNotFound` when a bill of materials references a material id
/// missing from `materials` (a stale caller-side snapshot).
pub fn plan_production(
    products: &[Product],
    orders: &[Order],
    materials: &[Material],
    targets: &ManualTargets,
) -> CoreResult<ProductionPlan> {
    let material_index: HashMap<&str, &Material> =
        materials.iter().map(|m| (m.id.as_str(), m)).collect();

    // Backlog: open-order quantity per product
    let mut backlog: HashMap<&str, i64> = HashMap::new();
    for order in orders {
        if !order.status.is_open_for_production() {
            continue;
        }
        for item in &order.items {
            *backlog.entry(item.product_id.as_str()).or_insert(0) += item.quantity;
        }
    }

    let mut product_plans = Vec::new();
    let mut demand: HashMap<&str, (i64, i64)> = HashMap::new(); // id -> (needed, cost)

    for product in products {
        let open_order_quantity = backlog.get(product.id.as_str()).copied().unwrap_or(0);
        let manual_quantity = targets.get(&product.id);
        let total_to_produce = open_order_quantity + manual_quantity;

        if total_to_produce == 0 {
            continue;
        }

        let mut requirements = Vec::new();
        for line in &product.bill_of_materials {
            let material = material_index.get(line.material_id.as_str()).ok_or_else(|| {
                CoreError::MaterialNotFound {
                    material_id: line.material_id.clone(),
                }
            })?;

            let quantity_needed = line.quantity_per_unit * total_to_produce;
            let cost_cents = line.cost_per_unit_cents * quantity_needed;

            let entry = demand.entry(material.id.as_str()).or_insert((0, 0));
            entry.0 += quantity_needed;
            entry.1 += cost_cents;

            requirements.push(MaterialRequirement {
                material_id: material.id.clone(),
                material_name: material.name.clone(),
                unit: material.unit.clone(),
                quantity_needed,
                cost_cents,
            });
        }

        product_plans.push(ProductPlan {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            open_order_quantity,
            manual_quantity,
            total_to_produce,
            requirements,
        });
    }

    // Aggregate in the caller's material order for a stable report
    let material_demands = materials
        .iter()
        .filter_map(|material| {
            let &(quantity_needed, cost_cents) = demand.get(material.id.as_str())?;
            Some(MaterialDemand {
                material_id: material.id.clone(),
                material_name: material.name.clone(),
                unit: material.unit.clone(),
                quantity_needed,
                available: material.current_stock,
                deficit: material.current_stock - quantity_needed,
                cost_cents,
            })
        })
        .collect();

    Ok(ProductionPlan {
        products: product_plans,
        materials: material_demands,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BomLine, OrderStatus, SaleItem};
    use chrono::NaiveDate;

    fn product(id: &str, name: &str, quantity: i64, bom: Vec<BomLine>) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            category: None,
            unit_price_cents: 1200,
            quantity,
            bill_of_materials: bom,
            price_history: Vec::new(),
        }
    }

    fn material(id: &str, name: &str, stock: i64, cost: i64) -> Material {
        Material {
            id: id.to_string(),
            name: name.to_string(),
            unit: "g".to_string(),
            current_stock: stock,
            alert_threshold: 0,
            cost_per_unit_cents: cost,
        }
    }

    fn order(product_id: &str, qty: i64, status: OrderStatus) -> Order {
        Order {
            id: format!("o-{product_id}-{qty}"),
            customer_id: "c-1".to_string(),
            items: vec![SaleItem {
                product_id: product_id.to_string(),
                product_name: "Candle".to_string(),
                quantity: qty,
                unit_price_cents: 1200,
                line_total_cents: 1200 * qty,
            }],
            order_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            expected_delivery: None,
            delivered_at: None,
            status,
            payment_method: None,
            notes: None,
        }
    }

    fn wax_bom() -> Vec<BomLine> {
        vec![
            BomLine {
                material_id: "wax".to_string(),
                quantity_per_unit: 200,
                cost_per_unit_cents: 2,
            },
            BomLine {
                material_id: "wick".to_string(),
                quantity_per_unit: 1,
                cost_per_unit_cents: 30,
            },
        ]
    }

    #[test]
    fn test_only_open_orders_count() {
        let products = vec![product("p-1", "Jar Candle", 0, wax_bom())];
        let materials = vec![material("wax", "Soy wax", 10_000, 2), material("wick", "Wick", 50, 30)];
        let orders = vec![
            order("p-1", 3, OrderStatus::Pending),
            order("p-1", 2, OrderStatus::InProduction),
            order("p-1", 9, OrderStatus::ReadyForDelivery),
            order("p-1", 9, OrderStatus::Delivered),
            order("p-1", 9, OrderStatus::Cancelled),
        ];

        let plan =
            plan_production(&products, &orders, &materials, &ManualTargets::new()).unwrap();

        assert_eq!(plan.products.len(), 1);
        assert_eq!(plan.products[0].open_order_quantity, 5);
        assert_eq!(plan.products[0].total_to_produce, 5);
    }

    #[test]
    fn test_manual_targets_add_to_backlog() {
        let products = vec![product("p-1", "Jar Candle", 0, wax_bom())];
        let materials = vec![material("wax", "Soy wax", 10_000, 2), material("wick", "Wick", 50, 30)];
        let orders = vec![order("p-1", 3, OrderStatus::Pending)];

        let mut targets = ManualTargets::new();
        targets.set("p-1", 7);

        let plan = plan_production(&products, &orders, &materials, &targets).unwrap();
        assert_eq!(plan.products[0].manual_quantity, 7);
        assert_eq!(plan.products[0].total_to_produce, 10);

        // 10 units × 200g wax, 10 wicks
        assert_eq!(plan.products[0].requirements[0].quantity_needed, 2000);
        assert_eq!(plan.products[0].requirements[1].quantity_needed, 10);
    }

    #[test]
    fn test_material_aggregation_and_deficit() {
        let products = vec![
            product("p-1", "Jar Candle", 0, wax_bom()),
            product(
                "p-2",
                "Pillar Candle",
                0,
                vec![BomLine {
                    material_id: "wax".to_string(),
                    quantity_per_unit: 300,
                    cost_per_unit_cents: 2,
                }],
            ),
        ];
        let materials = vec![material("wax", "Soy wax", 1000, 2), material("wick", "Wick", 1, 30)];
        let orders = vec![
            order("p-1", 2, OrderStatus::Pending),
            order("p-2", 3, OrderStatus::Pending),
        ];

        let plan =
            plan_production(&products, &orders, &materials, &ManualTargets::new()).unwrap();

        // wax: 2×200 + 3×300 = 1300 needed against 1000 on hand
        let wax = &plan.materials[0];
        assert_eq!(wax.material_id, "wax");
        assert_eq!(wax.quantity_needed, 1300);
        assert_eq!(wax.deficit, -300);
        assert_eq!(wax.cost_cents, 2600);

        // wick: 2 needed against 1 on hand
        let wick = &plan.materials[1];
        assert_eq!(wick.quantity_needed, 2);
        assert_eq!(wick.deficit, -1);
    }

    #[test]
    fn test_products_with_nothing_to_produce_are_omitted() {
        let products = vec![
            product("p-1", "Jar Candle", 0, wax_bom()),
            product("p-idle", "Idle Product", 50, wax_bom()),
        ];
        let materials = vec![material("wax", "Soy wax", 10_000, 2), material("wick", "Wick", 50, 30)];
        let orders = vec![order("p-1", 1, OrderStatus::Pending)];

        let plan =
            plan_production(&products, &orders, &materials, &ManualTargets::new()).unwrap();
        assert_eq!(plan.products.len(), 1);
        assert_eq!(plan.products[0].product_id, "p-1");
    }

    #[test]
    fn test_unknown_material_in_bom() {
        let products = vec![product(
            "p-1",
            "Jar Candle",
            0,
            vec![BomLine {
                material_id: "ghost".to_string(),
                quantity_per_unit: 1,
                cost_per_unit_cents: 1,
            }],
        )];
        let orders = vec![order("p-1", 1, OrderStatus::Pending)];

        let err = plan_production(&products, &orders, &[], &ManualTargets::new()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::MaterialNotFound { material_id } if material_id == "ghost"
        ));
    }

    #[test]
    fn test_auto_fill_tops_up_to_threshold() {
        let products = vec![
            product("p-low", "Low Stock", 2, Vec::new()),
            product("p-full", "Full Stock", 9, Vec::new()),
            product("p-custom", "Wedding Special", 0, Vec::new()),
        ];

        let targets =
            ManualTargets::auto_fill(&products, 5, |p| p.name.contains("Special"));

        assert_eq!(targets.get("p-low"), 3); // 5 - 2
        assert_eq!(targets.get("p-full"), 0); // already above threshold
        assert_eq!(targets.get("p-custom"), 0); // excluded by predicate
    }
}
