//! Sources of "now".
//!
//! Views take one instant per render or tick from a single `Clock` and hand it
//! to the resolver, so every badge on a screen is derived from the same now.

use chrono::{DateTime, Duration, Utc};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    pub fn set(&mut self, now: DateTime<Utc>) {
        self.now = now;
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

/// Another clock shifted by a constant offset, for replaying a list as it
/// would have looked at a different moment.
#[derive(Debug, Clone, Copy)]
pub struct OffsetClock<C> {
    inner: C,
    offset: Duration,
}

impl<C: Clock> OffsetClock<C> {
    pub fn new(inner: C, offset: Duration) -> Self {
        Self { inner, offset }
    }

    /// Offset that makes `inner` read `target` right now.
    pub fn anchored_at(inner: C, target: DateTime<Utc>) -> Self {
        let offset = target.signed_duration_since(inner.now());
        Self { inner, offset }
    }
}

impl<C: Clock> Clock for OffsetClock<C> {
    fn now(&self) -> DateTime<Utc> {
        self.inner.now() + self.offset
    }
}
