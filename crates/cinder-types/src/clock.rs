//! Wall-clock abstraction.
//!
//! Streak gaps, stoke cadence, and link dates all hinge on "today", so
//! engines take a [`Clock`] instead of reading system time directly.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

/// Calendar day (UTC) containing the given Unix timestamp.
pub fn day_of_timestamp(ts: i64) -> NaiveDate {
    DateTime::from_timestamp(ts, 0)
        .unwrap_or_default()
        .date_naive()
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current moment as Unix seconds.
    fn now_ts(&self) -> i64;

    /// Calendar day for the current moment.
    fn today(&self) -> NaiveDate {
        day_of_timestamp(self.now_ts())
    }
}

/// System wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ts(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Settable clock for tests. Clones share the same instant, so every
/// engine wired with a clone observes the same advance.
#[derive(Clone, Debug)]
pub struct FixedClock(Arc<AtomicI64>);

impl FixedClock {
    pub fn at(ts: i64) -> Self {
        Self(Arc::new(AtomicI64::new(ts)))
    }

    pub fn set(&self, ts: i64) {
        self.0.store(ts, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: i64) {
        self.0.fetch_add(secs, Ordering::SeqCst);
    }

    pub fn advance_days(&self, days: i64) {
        self.advance(days * 86_400);
    }
}

impl Clock for FixedClock {
    fn now_ts(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}
