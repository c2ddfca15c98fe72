//! # Installment Schedule
//!
//! A financed expense split into N equal installments with strictly
//! sequential pay/unpay transitions.
//!
//! ## The Prefix Invariant
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Paid installments always form an unbroken prefix {1..k}:              │
//! │                                                                         │
//! │    [✓][✓][✓][ ][ ][ ]   valid   (k = 3)                                │
//! │    [✓][ ][✓][ ][ ][ ]   impossible to reach                            │
//! │                                                                         │
//! │  pay(n)    allowed only when 1..n-1 are all paid                       │
//! │  unpay(n)  allowed only when n is the LAST paid installment            │
//! │                                                                         │
//! │  Real installment plans allow neither skipped payments nor             │
//! │  un-paying the middle of a settled run.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::validate_installment_count;

// =============================================================================
// Types
// =============================================================================

/// Payment state of a single installment.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InstallmentEntry {
    /// 1-based installment number.
    pub number: u32,

    /// Whether this installment has been paid.
    pub is_paid: bool,

    /// Date the installment was paid, if it has been.
    #[ts(as = "Option<String>")]
    pub paid_date: Option<NaiveDate>,
}

/// A financed expense paid off in N equal installments.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InstallmentPlan {
    pub id: String,

    /// What was financed ("wax melter", "December packaging run").
    pub description: String,

    /// Total financed amount in cents.
    pub total_cents: i64,

    /// Number of installments (N >= 1).
    pub installment_count: u32,

    /// total / N, integer division. The sub-cent remainder (< N cents) is
    /// intentionally not redistributed across installments.
    pub per_installment_cents: i64,

    #[ts(as = "String")]
    pub start_date: NaiveDate,

    /// Exactly N entries, ordered by installment number.
    pub payments: Vec<InstallmentEntry>,
}

impl InstallmentPlan {
    /// Creates a plan with N unpaid installments.
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        total: Money,
        installment_count: u32,
        start_date: NaiveDate,
    ) -> CoreResult<Self> {
        validate_installment_count(installment_count)?;

        let payments = (1..=installment_count)
            .map(|number| InstallmentEntry {
                number,
                is_paid: false,
                paid_date: None,
            })
            .collect();

        Ok(InstallmentPlan {
            id: id.into(),
            description: description.into(),
            total_cents: total.cents(),
            installment_count,
            per_installment_cents: total.cents() / installment_count as i64,
            start_date,
            payments,
        })
    }

    /// The first unpaid installment number, or None when fully paid.
    pub fn first_unpaid(&self) -> Option<u32> {
        self.payments.iter().find(|p| !p.is_paid).map(|p| p.number)
    }

    /// The highest paid installment number, or None when nothing is paid.
    ///
    /// Under the prefix invariant this is also the COUNT of paid
    /// installments.
    pub fn last_paid(&self) -> Option<u32> {
        self.payments
            .iter()
            .rev()
            .find(|p| p.is_paid)
            .map(|p| p.number)
    }

    /// Checks whether every installment is paid.
    pub fn is_fully_paid(&self) -> bool {
        self.first_unpaid().is_none()
    }

    /// Marks an installment paid or unpaid.
    ///
    /// ## Rules
    /// * `paid = true` requires installments 1..(n-1) to all be paid;
    ///   otherwise `OutOfSequence` naming the first missing one. Paying an
    ///   already-paid installment is a no-op (the original paid date is
    ///   kept).
    /// * `paid = false` requires n to be the most recently paid
    ///   installment; otherwise `NotLastPaid`.
    /// * A number outside 1..=N is `InstallmentNotFound`.
    pub fn set_paid(&mut self, number: u32, paid: bool, today: NaiveDate) -> CoreResult<()> {
        if number == 0 || number > self.installment_count {
            return Err(CoreError::InstallmentNotFound { number });
        }

        if paid {
            // Every earlier installment must already be settled.
            if let Some(first_unpaid) = self.first_unpaid() {
                if first_unpaid < number {
                    return Err(CoreError::OutOfSequence {
                        expected: first_unpaid,
                    });
                }
            }
            let entry = &mut self.payments[(number - 1) as usize];
            if !entry.is_paid {
                entry.is_paid = true;
                entry.paid_date = Some(today);
            }
        } else {
            let last_paid = self.last_paid().unwrap_or(0);
            if number != last_paid {
                return Err(CoreError::NotLastPaid { last_paid });
            }
            let entry = &mut self.payments[(number - 1) as usize];
            entry.is_paid = false;
            entry.paid_date = None;
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
