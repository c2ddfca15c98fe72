//! # candela-core: Pure Business Logic for Candela Ops
//!
//! This crate is the **heart** of Candela Ops, the operations tool for a
//! small candle manufacturing/retail business. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Candela Ops Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Host Application (UI, persistence)             │   │
//! │  │    Sale form ──► Order board ──► Planner screen ──► Reports    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    candela-engine                               │   │
//! │  │    Sale lifecycle, stock ledger, order conversion, clock       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ candela-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ discount  │  │    jar    │  │   │
//! │  │   │  Product  │  │   Money   │  │  pricing  │  │  credits  │  │   │
//! │  │   │   Sale    │  │   Rate    │  │ breakdown │  │  preview  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                 │   │
//! │  │   │installment│  │  planner  │  │  catalog  │                 │   │
//! │  │   │  prefix   │  │ material  │  │  queries  │                 │   │
//! │  │   │ invariant │  │  demand   │  │           │                 │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO SYSTEM CLOCK • PURE FUNCTIONS      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Material, Customer, Sale, Order)
//! - [`money`] - Money and discount rates with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Field-level input validation
//! - [`discount`] - Sale pricing (stacked discounts, jar cash, shipping)
//! - [`jar`] - Returnable-jar credit allocation preview
//! - [`installment`] - Sequential installment schedules
//! - [`planner`] - Production requirement planning
//! - [`catalog`] - Pure catalog queries for UI decisions
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input =
//!    same output. Even "today" is a parameter, never a system call.
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are cents (i64), all rates
//!    basis points (u32); no floating point in any computation
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use candela_core::discount::price_sale;
//! use candela_core::money::{DiscountRate, Money};
//! use candela_core::types::SaleItem;
//!
//! let items = vec![SaleItem {
//!     product_id: "p-1".into(),
//!     product_name: "Lavender Jar".into(),
//!     quantity: 2,
//!     unit_price_cents: 1200,
//!     line_total_cents: 2400,
//! }];
//!
//! let breakdown = price_sale(
//!     &items,
//!     DiscountRate::from_bps(1000), // 10% birthday
//!     DiscountRate::zero(),
//!     Money::zero(),
//!     Money::zero(),
//! )
//! .unwrap();
//!
//! assert_eq!(breakdown.total_cents, 2160);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod discount;
pub mod error;
pub mod installment;
pub mod jar;
pub mod money;
pub mod planner;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use candela_core::Money` instead of
// `use candela_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{DiscountRate, Money};
pub use types::*;
