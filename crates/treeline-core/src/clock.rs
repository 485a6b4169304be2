//! Time sources for stamping commits.

use chrono::{DateTime, Utc};
use std::cell::Cell;

/// A source of "now" for the destination repository.
pub trait Clock {
    /// The instant a new commit should be stamped with.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock whose current instant can be pinned.
///
/// While an override is set every call to [`Clock::now`] returns it; once
/// cleared the clock reports wall time again. Writes are last-write-wins.
/// The clock is scoped to a single import run and is not `Sync`.
#[derive(Debug, Default)]
pub struct OverridableClock {
    pinned: Cell<Option<DateTime<Utc>>>,
}

impl OverridableClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the clock to `instant`.
    pub fn set(&self, instant: DateTime<Utc>) {
        self.pinned.set(Some(instant));
    }

    /// Drop the override and fall back to wall time.
    pub fn clear(&self) {
        self.pinned.set(None);
    }

    /// The currently pinned instant, if any.
    pub fn pinned(&self) -> Option<DateTime<Utc>> {
        self.pinned.get()
    }
}

impl Clock for OverridableClock {
    fn now(&self) -> DateTime<Utc> {
        self.pinned.get().unwrap_or_else(Utc::now)
    }
}
