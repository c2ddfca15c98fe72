//! # Clock
//!
//! An injectable time source.
//!
//! The birthday discount depends on "the current month", sale dates and
//! installment paid-dates are stamped "today", and price history records
//! "now". Reading the system clock directly would bury those dependencies
//! inside business flows, so the engine takes a [`Clock`] instead:
//! [`SystemClock`] in production, [`FixedClock`] in tests.

use chrono::{DateTime, NaiveDate, Utc};

/// A source of the current time.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;

    /// The current date.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock time. The only place in the workspace that reads the system
/// clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to a fixed instant, for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Pins the clock to midnight UTC on the given date.
    pub fn on(date: NaiveDate) -> Self {
        FixedClock(date.and_hms_opt(0, 0, 0).expect("valid midnight").and_utc())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_reports_its_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let clock = FixedClock::on(date);
        assert_eq!(clock.today(), date);
        assert_eq!(clock.now().date_naive(), date);
    }
}
