// set-pill-tui/src/app/tick.rs
use std::time::{Duration, Instant};

use set_pill_lib::{Intent, TimerToken};

const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy)]
struct Schedule {
    token: TimerToken,
    next_due: Instant,
}

/// Turns wall time into tick intents for the controller's live timers.
///
/// A token seen for the first time is due one period later. A missed period
/// (slow frame, suspended terminal) is caught up with one tick per period.
/// Tokens the controller no longer reports are forgotten.
#[derive(Debug, Default)]
pub struct TickScheduler {
    workout: Option<Schedule>,
    rest: Option<Schedule>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the ticks due at `now` for the given live tokens.
    pub fn due(
        &mut self,
        workout: Option<TimerToken>,
        rest: Option<TimerToken>,
        now: Instant,
    ) -> Vec<Intent> {
        let mut ticks = Vec::new();
        Self::collect(&mut self.workout, workout, now, &mut ticks);
        Self::collect(&mut self.rest, rest, now, &mut ticks);
        ticks
    }

    fn collect(
        slot: &mut Option<Schedule>,
        live: Option<TimerToken>,
        now: Instant,
        ticks: &mut Vec<Intent>,
    ) {
        let Some(token) = live else {
            *slot = None;
            return;
        };
        if slot.map_or(true, |s| s.token != token) {
            *slot = Some(Schedule {
                token,
                next_due: now + TICK_PERIOD,
            });
        }
        let Some(schedule) = slot.as_mut() else {
            return;
        };
        while schedule.next_due <= now {
            ticks.push(Intent::Tick(token));
            schedule.next_due += TICK_PERIOD;
        }
    }
}
