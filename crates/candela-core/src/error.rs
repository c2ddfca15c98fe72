//! # Error Types
//!
//! Domain-specific error types for candela-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  candela-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  candela-engine errors (separate crate)                                │
//! │  └── EngineError      - Stock/store operation failures                 │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → EngineError → host application    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (installment number, material id)
//! 3. Errors are enum variants, never String
//! 4. Invalid input is rejected, never coerced or clamped

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages by the
/// host application.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A percentage discount is outside the valid [0, 100] range.
    ///
    /// ## When This Occurs
    /// - Negative discount entered in the sale form
    /// - Discount above 100% entered (typo such as 150 for 15)
    ///
    /// The value is rejected as-is; it is never clamped into range.
    #[error("Invalid discount percentage: {value} (must be between 0 and 100)")]
    InvalidDiscount { value: f64 },

    /// A sale was moved to Paid without a payment method.
    #[error("A payment method is required to mark a sale as paid")]
    PaymentMethodRequired,

    /// The requested status change is not allowed by the lifecycle.
    ///
    /// ## When This Occurs
    /// - Changing the status of a Paid sale (Paid is terminal)
    /// - Delivering an already Delivered or Cancelled order
    #[error("Cannot change status from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    /// A sale was created with no line items.
    #[error("A sale must contain at least one item")]
    EmptySale,

    /// An installment was paid out of order.
    ///
    /// ## When This Occurs
    /// - Paying installment 3 while installment 1 or 2 is still open
    ///
    /// `expected` names the first unpaid installment so the caller can say
    /// exactly which payment is due next.
    #[error("Installment {expected} must be paid first")]
    OutOfSequence { expected: u32 },

    /// An installment other than the most recently paid one was un-paid.
    #[error("Only the last paid installment ({last_paid}) can be reverted")]
    NotLastPaid { last_paid: u32 },

    /// An installment number outside 1..=count was referenced.
    #[error("Installment {number} does not exist in this plan")]
    InstallmentNotFound { number: u32 },

    /// A bill-of-materials line references a material that was not supplied
    /// to the planner. Indicates a stale caller-side snapshot.
    #[error("Material not found: {material_id}")]
    MaterialNotFound { material_id: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
