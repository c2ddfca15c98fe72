//! # Store Interfaces
//!
//! The engine never owns persistence. The host application injects
//! implementations of these traits (SQLite, an HTTP API, browser storage);
//! the engine only demands the operations below.
//!
//! ## Store Surface
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Injected Stores                                   │
//! │                                                                         │
//! │  ProductStore      product, products, apply_quantity_delta,            │
//! │                    append_price_history                                │
//! │  CustomerStore     customer, update_jar_credits                        │
//! │  SaleStore         insert_sale, sale, update_sale, remove_sale, sales  │
//! │  InstallmentStore  plan, upsert_plan                                   │
//! │  SettingsStore     settings                                            │
//! │                                                                         │
//! │  EngineStore = all five (blanket impl)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All methods are synchronous: the engine runs a single-actor,
//! run-to-completion model, and any retry/timeout policy around real I/O
//! belongs to the host, not here.
//!
//! [`memory::MemoryStore`] implements all five traits and backs the test
//! suite.

pub mod memory;

use candela_core::installment::InstallmentPlan;
use candela_core::types::{Customer, PriceChange, Product, Sale, Settings};

use crate::error::EngineResult;

// =============================================================================
// Product Store
// =============================================================================

/// Read/write access to products and their stock levels.
pub trait ProductStore {
    /// Fetches a product by id. `ProductNotFound` when absent.
    fn product(&self, id: &str) -> EngineResult<Product>;

    /// Fetches the whole catalog.
    fn products(&self) -> EngineResult<Vec<Product>>;

    /// Adds a signed delta to a product's on-hand quantity, returning the
    /// new quantity.
    ///
    /// The delta is applied against the store's CURRENT quantity, not a
    /// caller snapshot. Callers must run the stock ledger's availability
    /// check first; this method does not re-check.
    fn apply_quantity_delta(&mut self, id: &str, delta: i64) -> EngineResult<i64>;

    /// Appends a price change to a product's history and updates its unit
    /// price. History is append-only; out-of-order timestamps are
    /// rejected.
    fn append_price_history(&mut self, id: &str, entry: PriceChange) -> EngineResult<()>;
}

// =============================================================================
// Customer Store
// =============================================================================

/// Read/write access to customers and their jar-credit balances.
pub trait CustomerStore {
    /// Fetches a customer by id. `CustomerNotFound` when absent.
    fn customer(&self, id: &str) -> EngineResult<Customer>;

    /// Replaces a customer's jar-credit balance.
    fn update_jar_credits(&mut self, id: &str, new_balance: i64) -> EngineResult<()>;
}

// =============================================================================
// Sale Store
// =============================================================================

/// Read/write access to committed sales.
pub trait SaleStore {
    /// Persists a new sale.
    fn insert_sale(&mut self, sale: Sale) -> EngineResult<()>;

    /// Fetches a sale by id. `SaleNotFound` when absent.
    fn sale(&self, id: &str) -> EngineResult<Sale>;

    /// Replaces a persisted sale. `SaleNotFound` when absent.
    fn update_sale(&mut self, sale: Sale) -> EngineResult<()>;

    /// Removes a sale. `SaleNotFound` when absent.
    fn remove_sale(&mut self, id: &str) -> EngineResult<()>;

    /// Fetches all sales.
    fn sales(&self) -> EngineResult<Vec<Sale>>;
}

// =============================================================================
// Installment Store
// =============================================================================

/// Read/write access to installment plans.
pub trait InstallmentStore {
    /// Fetches a plan by id. `PlanNotFound` when absent.
    fn plan(&self, id: &str) -> EngineResult<InstallmentPlan>;

    /// Inserts or replaces a plan.
    fn upsert_plan(&mut self, plan: InstallmentPlan) -> EngineResult<()>;
}

// =============================================================================
// Settings Store
// =============================================================================

/// Read-only access to engine-relevant settings.
pub trait SettingsStore {
    fn settings(&self) -> EngineResult<Settings>;
}

// =============================================================================
// Combined Store
// =============================================================================

/// Everything the engine needs, as one bound.
pub trait EngineStore:
    ProductStore + CustomerStore + SaleStore + InstallmentStore + SettingsStore
{
}

impl<T> EngineStore for T where
    T: ProductStore + CustomerStore + SaleStore + InstallmentStore + SettingsStore
{
}
