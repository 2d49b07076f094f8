// set-pill-lib/src/timer.rs
use chrono::{DateTime, Duration, Utc};
use std::cell::Cell;
use std::rc::Rc;
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TimerKind {
    Workout,
    Rest,
}

/// Identifies one run of a timer. Ticks carry the token of the run that
/// scheduled them; once the run is stopped or replaced the token goes stale
/// and its ticks are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken {
    kind: TimerKind,
    generation: u64,
}

impl TimerToken {
    pub const fn kind(&self) -> TimerKind {
        self.kind
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// At most one live run per slot.
#[derive(Debug)]
pub(crate) struct TimerSlot {
    kind: TimerKind,
    generation: u64,
    live: bool,
}

impl TimerSlot {
    pub(crate) const fn new(kind: TimerKind) -> Self {
        Self {
            kind,
            generation: 0,
            live: false,
        }
    }

    /// Starts a new run, cancelling any previous one.
    pub(crate) fn start(&mut self) -> TimerToken {
        self.generation += 1;
        self.live = true;
        TimerToken {
            kind: self.kind,
            generation: self.generation,
        }
    }

    /// Returns whether a run was live.
    pub(crate) fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.live, false)
    }

    pub(crate) fn token(&self) -> Option<TimerToken> {
        self.live.then_some(TimerToken {
            kind: self.kind,
            generation: self.generation,
        })
    }

    pub(crate) fn accepts(&self, token: TimerToken) -> bool {
        self.token() == Some(token)
    }
}

/// Source of wall-clock time for elapsed-time calculations.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Hand-driven clock. Clones share the same instant, so a test can keep one
/// handle while the controller owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance_secs(&self, seconds: i64) {
        self.now.set(self.now.get() + Duration::seconds(seconds));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}
