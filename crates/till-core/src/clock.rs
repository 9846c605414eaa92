//! # Clock
//!
//! Injectable source of "now" for reporting windows.
//!
//! Report code never reads the wall clock directly; it asks a [`Clock`].
//! The server uses [`SystemClock`], tests pin time with [`FixedClock`] so
//! window boundaries can be asserted exactly.

use chrono::{DateTime, Local};
use std::fmt::Debug;

/// A capability that provides the current local time.
pub trait Clock: Debug + Send + Sync {
    /// Current instant in the server's local time zone.
    fn now(&self) -> DateTime<Local>;
}

/// Reads the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Local>);

impl FixedClock {
    pub fn new(at: DateTime<Local>) -> Self {
        FixedClock(at)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock_is_stable() {
        let at = Local.with_ymd_and_hms(2026, 3, 18, 14, 30, 0).earliest().unwrap();
        let clock = FixedClock::new(at);

        assert_eq!(clock.now(), at);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        assert!(clock.now() >= first);
    }
}
