//! # candela-engine: Lifecycle Engine for Candela Ops
//!
//! This crate coordinates the flows that MUTATE state: sales that consume
//! stock and jar credits, order deliveries that become sales, installment
//! payments, price changes. All pure math lives in candela-core; all
//! persistence lives behind the store traits the host implements.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Candela Ops Data Flow                              │
//! │                                                                         │
//! │  Host Application (sale form, order board)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  candela-engine (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    Engine     │    │  stock ledger │    │ store traits │  │   │
//! │  │   │ (engine.rs)   │    │  (stock.rs)   │    │ + MemoryStore│  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ sale flows    │◄───│ reserve       │    │ ProductStore │  │   │
//! │  │   │ order flows   │    │ consume       │◄───│ SaleStore    │  │   │
//! │  │   │ installments  │    │ release       │    │ ...          │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  candela-core: pricing, jar allocation, installment rules, planning    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`engine`] - The `Engine` struct and cross-cutting operations
//! - [`sale`] - Sale create/update/delete flows
//! - [`order`] - Order delivery and conversion to sales
//! - [`stock`] - The stock ledger (all-or-nothing reserve/consume/release)
//! - [`store`] - Store traits and the in-memory implementation
//! - [`clock`] - Injectable time source
//! - [`error`] - Engine error types
//!
//! ## Usage
//!
//! ```rust
//! use candela_core::types::{Customer, Product, SaleStatus, Settings};
//! use candela_engine::sale::{NewSale, NewSaleLine};
//! use candela_engine::store::memory::MemoryStore;
//! use candela_engine::Engine;
//!
//! let mut store = MemoryStore::new(Settings {
//!     low_stock_threshold: 5,
//!     birthday_discount_bps: 1000,
//!     jar_discount_per_unit_cents: 500,
//! });
//! store.add_product(Product {
//!     id: "p-1".into(),
//!     name: "Lavender Jar".into(),
//!     category: None,
//!     unit_price_cents: 1200,
//!     quantity: 10,
//!     bill_of_materials: Vec::new(),
//!     price_history: Vec::new(),
//! });
//! store.add_customer(Customer {
//!     id: "c-1".into(),
//!     name: "Ada".into(),
//!     birth_month: None,
//!     birth_day: None,
//!     jar_credits: 0,
//! });
//!
//! let mut engine = Engine::new(store);
//! let sale = engine
//!     .create_sale(NewSale {
//!         customer_id: "c-1".into(),
//!         lines: vec![NewSaleLine { product_id: "p-1".into(), quantity: 2 }],
//!         status: SaleStatus::Pending,
//!         payment_method: None,
//!         additional_discount_percent: 0.0,
//!         shipping_cents: 0,
//!         notes: None,
//!     })
//!     .unwrap();
//!
//! assert_eq!(sale.total_cents, 2400);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod clock;
pub mod engine;
pub mod error;
pub mod order;
pub mod sale;
pub mod stock;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::Engine;
pub use error::{EngineError, EngineResult};
pub use sale::{NewSale, NewSaleLine};
pub use store::memory::MemoryStore;
