// set-pill-lib/src/flow.rs
//! The pill state machine.
//!
//! A `FlowController` owns one workout session: the set ledger, the workout
//! and rest timers, the focused input field and the current pill mode. Every
//! user action and every timer tick arrives as an [`Intent`] through
//! [`FlowController::handle`], so all state changes happen on the caller's
//! thread, one at a time. Intents that make no sense in the current mode are
//! ignored.

use chrono::{DateTime, Utc};
use strum_macros::Display;
use tracing::{debug, info};

use crate::config::Config;
use crate::format::format_duration;
use crate::history::{CompletedSet, HistoryStore, WorkoutHistoryEntry};
use crate::ledger::{FieldSelection, SetLedger, SetRecord};
use crate::timer::{Clock, TimerKind, TimerSlot, TimerToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum PillMode {
    #[default]
    Start,
    ActiveTimer,
    Keyboard,
    RestPicker,
    Countdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Start,
    Finish,
    TapTimerIcon,
    TapField(FieldSelection),
    KeyTap(char),
    Backspace,
    NextField,
    DismissKeyboard,
    PickRest(u32),
    DismissRestPicker,
    SkipRest,
    Tick(TimerToken),
    StartNewWorkout,
}

/// Observable session state, read by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlowState {
    pub mode: PillMode,
    pub previous_mode: PillMode,
    pub workout_started: bool,
    pub workout_start_timestamp: Option<DateTime<Utc>>,
    pub elapsed_seconds: u64,
    pub rest_duration_seconds: u32,
    pub rest_remaining_seconds: u32,
    pub is_rest_active: bool,
    pub show_summary: bool,
}

/// Per-session settings, normally taken from `Config`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub exercise_name: String,
    pub set_count: usize,
    pub rest_presets: Vec<u32>,
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            exercise_name: config.exercise_name.clone(),
            set_count: config.set_count,
            rest_presets: config.rest_presets.clone(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// What the summary screen shows after the last set is finished.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSummary {
    pub exercise_name: String,
    pub completed_at: DateTime<Utc>,
    pub sets: Vec<CompletedSet>,
}

impl WorkoutSummary {
    /// Sum of weight × reps over sets whose text parses as numbers.
    pub fn total_volume(&self) -> f64 {
        self.sets
            .iter()
            .filter_map(|s| Some(s.weight.parse::<f64>().ok()? * s.reps.parse::<f64>().ok()?))
            .sum()
    }
}

pub struct FlowController<H: HistoryStore> {
    settings: SessionSettings,
    ledger: SetLedger,
    state: FlowState,
    selected_field: Option<FieldSelection>,
    workout_timer: TimerSlot,
    rest_timer: TimerSlot,
    previous_sets: Vec<CompletedSet>,
    summary: Option<WorkoutSummary>,
    history: H,
    clock: Box<dyn Clock>,
}

impl<H: HistoryStore> FlowController<H> {
    /// Creates a session with an empty ledger in `Start` mode and loads the
    /// previous workout for the configured exercise.
    pub fn new(settings: SessionSettings, history: H, clock: Box<dyn Clock>) -> Self {
        let previous_sets = history.load_previous(&settings.exercise_name);
        Self {
            ledger: SetLedger::new(settings.set_count),
            state: FlowState::default(),
            selected_field: None,
            workout_timer: TimerSlot::new(TimerKind::Workout),
            rest_timer: TimerSlot::new(TimerKind::Rest),
            previous_sets,
            summary: None,
            settings,
            history,
            clock,
        }
    }

    /// Ends the session: both timers are stopped and the history store is
    /// handed back.
    pub fn dispose(mut self) -> H {
        self.workout_timer.stop();
        self.rest_timer.stop();
        self.history
    }

    /// Single entry point for user actions and timer ticks.
    pub fn handle(&mut self, intent: Intent) {
        debug!(?intent, mode = %self.state.mode, "handling intent");
        match intent {
            Intent::Start => self.start_workout(),
            Intent::Finish => self.finish_set(),
            Intent::TapTimerIcon => self.open_rest_picker(),
            Intent::TapField(selection) => self.show_keyboard(selection),
            Intent::KeyTap(ch) => self.key_tap(ch),
            Intent::Backspace => self.backspace(),
            Intent::NextField => self.next_field(),
            Intent::DismissKeyboard => self.hide_keyboard(),
            Intent::PickRest(seconds) => self.start_rest(seconds),
            Intent::DismissRestPicker => self.dismiss_rest_picker(),
            Intent::SkipRest => self.skip_rest(),
            Intent::Tick(token) => self.tick(token),
            Intent::StartNewWorkout => self.start_new_workout(),
        }
    }

    // --- Read access for the presentation layer ---

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn mode(&self) -> PillMode {
        self.state.mode
    }

    pub fn ledger(&self) -> &SetLedger {
        &self.ledger
    }

    pub fn sets(&self) -> &[SetRecord] {
        self.ledger.sets()
    }

    pub fn current_set_index(&self) -> usize {
        self.ledger.current_set_index()
    }

    pub fn selected_field(&self) -> Option<FieldSelection> {
        self.selected_field
    }

    pub fn can_start(&self) -> bool {
        self.ledger.can_start(self.ledger.current_set_index())
    }

    pub fn show_summary(&self) -> bool {
        self.state.show_summary
    }

    /// The finished workout, while the summary is requested.
    pub fn summary(&self) -> Option<&WorkoutSummary> {
        self.summary.as_ref().filter(|_| self.state.show_summary)
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.state.elapsed_seconds
    }

    pub fn formatted_elapsed_time(&self) -> String {
        format_duration(self.state.elapsed_seconds)
    }

    pub fn rest_remaining_seconds(&self) -> u32 {
        self.state.rest_remaining_seconds
    }

    pub fn rest_duration_seconds(&self) -> u32 {
        self.state.rest_duration_seconds
    }

    pub fn formatted_rest_remaining(&self) -> String {
        format_duration(u64::from(self.state.rest_remaining_seconds))
    }

    pub fn is_rest_active(&self) -> bool {
        self.state.is_rest_active
    }

    pub fn exercise_name(&self) -> &str {
        &self.settings.exercise_name
    }

    pub fn rest_presets(&self) -> &[u32] {
        &self.settings.rest_presets
    }

    /// Sets logged the last time this exercise was completed.
    pub fn previous_sets(&self) -> &[CompletedSet] {
        &self.previous_sets
    }

    pub fn previous_set(&self, set_number: usize) -> Option<&CompletedSet> {
        self.previous_sets
            .iter()
            .find(|s| s.set_number == set_number)
    }

    /// Token of the running workout timer; the driver ticks it once a second.
    pub fn workout_timer(&self) -> Option<TimerToken> {
        self.workout_timer.token()
    }

    /// Token of the running rest timer; the driver ticks it once a second.
    pub fn rest_timer(&self) -> Option<TimerToken> {
        self.rest_timer.token()
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    // --- Transitions ---

    fn start_workout(&mut self) {
        if self.state.mode != PillMode::Start || !self.can_start() {
            debug!("start ignored: set is not ready");
            return;
        }
        self.selected_field = None;
        self.workout_timer.start();
        self.state.workout_started = true;
        self.state.workout_start_timestamp = Some(self.clock.now());
        self.state.elapsed_seconds = 0;
        self.state.mode = PillMode::ActiveTimer;
        info!(
            set_number = self.ledger.current_set_index() + 1,
            "workout timer started"
        );
    }

    fn finish_set(&mut self) {
        if self.state.mode != PillMode::ActiveTimer {
            return;
        }
        self.refresh_elapsed();
        self.workout_timer.stop();
        self.stop_rest();

        let index = self.ledger.current_set_index();
        let completion_time = self.formatted_elapsed_time();
        info!(set_number = index + 1, %completion_time, "set finished");

        if self.ledger.is_last_actionable_set(index) {
            self.ledger.complete(index, completion_time);
            self.record_workout();
            self.reset_session_fields();
        } else if self.ledger.has_next_incomplete(index) {
            self.ledger.complete(index, completion_time);
            self.ledger.advance();
            self.reset_session_fields();
        } else {
            // Not reached while the cursor only moves forward: a populated
            // next record is never completed ahead of the cursor.
            self.ledger.complete(index, completion_time);
            self.reset_session_fields();
        }
    }

    /// Persists the completed sets and raises the summary. The cursor stays
    /// put until `StartNewWorkout`.
    fn record_workout(&mut self) {
        let sets = self.ledger.completed_sets();
        let completed_at = self.clock.now();
        self.history.save(WorkoutHistoryEntry {
            date: completed_at,
            exercise_name: self.settings.exercise_name.clone(),
            sets: sets.clone(),
        });
        self.summary = Some(WorkoutSummary {
            exercise_name: self.settings.exercise_name.clone(),
            completed_at,
            sets,
        });
        self.state.show_summary = true;
    }

    fn reset_session_fields(&mut self) {
        self.selected_field = None;
        self.state.workout_started = false;
        self.state.workout_start_timestamp = None;
        self.state.elapsed_seconds = 0;
        self.state.mode = PillMode::Start;
        self.state.previous_mode = PillMode::Start;
    }

    fn open_rest_picker(&mut self) {
        if !matches!(self.state.mode, PillMode::ActiveTimer | PillMode::Keyboard) {
            return;
        }
        self.state.previous_mode = self.state.mode;
        self.state.mode = PillMode::RestPicker;
    }

    fn show_keyboard(&mut self, selection: FieldSelection) {
        if !self.ledger.is_editable(selection) {
            return;
        }
        self.selected_field = Some(selection);
        // Tapping another field while the keyboard is up records Keyboard as
        // the previous mode; hide_keyboard then falls back on workout_started.
        // From the picker, the mode it will return to is kept instead.
        if self.state.mode != PillMode::RestPicker {
            self.state.previous_mode = self.state.mode;
        }
        self.state.mode = PillMode::Keyboard;
    }

    fn key_tap(&mut self, ch: char) {
        if self.state.mode != PillMode::Keyboard {
            return;
        }
        if let Some(sel) = self.selected_field {
            self.ledger.update(sel.set_number, sel.field, ch);
        }
    }

    fn backspace(&mut self) {
        if self.state.mode != PillMode::Keyboard {
            return;
        }
        if let Some(sel) = self.selected_field {
            self.ledger.delete_last(sel.set_number, sel.field);
        }
    }

    fn next_field(&mut self) {
        if self.state.mode != PillMode::Keyboard {
            return;
        }
        self.selected_field = Some(self.ledger.next_field(self.selected_field));
    }

    fn hide_keyboard(&mut self) {
        if self.state.mode != PillMode::Keyboard {
            return;
        }
        self.selected_field = None;
        self.state.mode = self.restorable(self.state.previous_mode);
    }

    fn start_rest(&mut self, seconds: u32) {
        if self.state.mode != PillMode::RestPicker {
            return;
        }
        self.rest_timer.start();
        self.state.rest_duration_seconds = seconds;
        self.state.rest_remaining_seconds = seconds;
        self.state.is_rest_active = true;
        self.state.mode = PillMode::Countdown;
        info!(seconds, "rest started");
    }

    fn dismiss_rest_picker(&mut self) {
        if self.state.mode != PillMode::RestPicker {
            return;
        }
        self.state.mode = self.restorable(self.state.previous_mode);
    }

    fn skip_rest(&mut self) {
        if self.state.mode != PillMode::Countdown {
            return;
        }
        self.stop_rest();
        self.state.mode = self.restorable(self.state.previous_mode);
    }

    fn tick(&mut self, token: TimerToken) {
        match token.kind() {
            TimerKind::Workout => {
                if self.workout_timer.accepts(token) {
                    self.refresh_elapsed();
                }
            }
            TimerKind::Rest => {
                if !self.rest_timer.accepts(token) {
                    return;
                }
                if self.state.rest_remaining_seconds > 0 {
                    self.state.rest_remaining_seconds -= 1;
                } else {
                    self.stop_rest();
                    info!("rest finished");
                    if self.state.mode == PillMode::Countdown {
                        self.state.mode = self.restorable(self.state.previous_mode);
                    }
                }
            }
        }
    }

    fn start_new_workout(&mut self) {
        self.workout_timer.stop();
        self.stop_rest();
        self.ledger = SetLedger::new(self.settings.set_count);
        self.selected_field = None;
        self.state = FlowState::default();
        self.summary = None;
        self.previous_sets = self.history.load_previous(&self.settings.exercise_name);
        info!(exercise = %self.settings.exercise_name, "new workout");
    }

    // --- Helpers ---

    fn refresh_elapsed(&mut self) {
        if let Some(started) = self.state.workout_start_timestamp {
            let seconds = (self.clock.now() - started).num_seconds().max(0);
            self.state.elapsed_seconds = u64::try_from(seconds).unwrap_or(0);
        }
    }

    fn stop_rest(&mut self) {
        self.rest_timer.stop();
        self.state.is_rest_active = false;
        self.state.rest_remaining_seconds = 0;
    }

    /// Mode to return to when an overlay closes. Targets that can no longer
    /// be shown (a keyboard with no field, a countdown with no rest, the
    /// picker itself) fall back to the timer or start pill.
    fn restorable(&self, target: PillMode) -> PillMode {
        let usable = match target {
            PillMode::Keyboard => self.selected_field.is_some(),
            PillMode::Countdown => self.state.is_rest_active,
            PillMode::RestPicker => false,
            PillMode::Start | PillMode::ActiveTimer => true,
        };
        if usable {
            target
        } else if self.state.workout_started {
            PillMode::ActiveTimer
        } else {
            PillMode::Start
        }
    }
}
