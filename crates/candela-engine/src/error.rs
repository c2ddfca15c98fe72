//! # Engine Error Types
//!
//! Error types for engine operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  CoreError / ValidationError (candela-core)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  EngineError (this module) ← Adds stock and referential failures       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Host application ← Translates to user-facing messages                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use candela_core::{CoreError, ValidationError};
use thiserror::Error;

/// Engine operation errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Not enough stock to cover a sale.
    ///
    /// ## When This Occurs
    /// - Creating a stock-touching sale whose quantities exceed on-hand
    /// - Un-cancelling a sale after the stock was sold elsewhere
    ///
    /// Recoverable: the caller adjusts quantities or cancels. Nothing was
    /// mutated; the check runs before any deduction.
    #[error("Insufficient stock for {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// Product id not present in the product store.
    ///
    /// Indicates a stale caller-side snapshot; refresh and retry.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Customer id not present in the customer store.
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// Sale id not present in the sale store.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Installment plan id not present in the installment store.
    #[error("Installment plan not found: {0}")]
    PlanNotFound(String),

    /// Business rule violation from candela-core.
    #[error("{0}")]
    Core(#[from] CoreError),
}

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::Core(CoreError::Validation(err))
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

// =============================================================================
// Unit Tests
// =============================================================================
