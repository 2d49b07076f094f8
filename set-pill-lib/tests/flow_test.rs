use chrono::{TimeZone, Utc};
use set_pill_lib::{
    Field, FieldSelection, FlowController, HistoryStore, Intent, ManualClock, MemoryStore,
    PillMode, SessionSettings, WorkoutHistory, HISTORY_KEY,
};

type TestController = FlowController<WorkoutHistory<MemoryStore>>;

fn settings(set_count: usize) -> SessionSettings {
    SessionSettings {
        exercise_name: "Bench Press".to_string(),
        set_count,
        rest_presets: vec![30, 60, 90],
    }
}

fn test_clock() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 7, 0, 0).unwrap())
}

fn create_controller() -> (TestController, ManualClock) {
    let clock = test_clock();
    let controller = FlowController::new(
        settings(3),
        WorkoutHistory::new(MemoryStore::new()),
        Box::new(clock.clone()),
    );
    (controller, clock)
}

// Enters values through the keyboard the way the presentation layer would.
fn enter(controller: &mut TestController, set_number: usize, weight: &str, reps: &str) {
    controller.handle(Intent::TapField(FieldSelection::new(set_number, Field::Weight)));
    for ch in weight.chars() {
        controller.handle(Intent::KeyTap(ch));
    }
    controller.handle(Intent::NextField);
    for ch in reps.chars() {
        controller.handle(Intent::KeyTap(ch));
    }
    controller.handle(Intent::DismissKeyboard);
}

fn tick_workout(controller: &mut TestController, clock: &ManualClock, seconds: u32) {
    for _ in 0..seconds {
        clock.advance_secs(1);
        let token = controller.workout_timer().expect("workout timer should be live");
        controller.handle(Intent::Tick(token));
    }
}

#[test]
fn starts_in_start_mode_with_empty_ledger() {
    let (controller, _) = create_controller();
    assert_eq!(controller.mode(), PillMode::Start);
    assert_eq!(controller.sets().len(), 3);
    assert_eq!(controller.current_set_index(), 0);
    assert!(!controller.can_start());
    assert!(!controller.show_summary());
    assert!(controller.previous_sets().is_empty());
    assert_eq!(controller.workout_timer(), None);
    assert_eq!(controller.rest_timer(), None);
}

#[test]
fn start_without_data_is_a_no_op() {
    let (mut controller, _) = create_controller();
    controller.handle(Intent::Start);
    assert_eq!(controller.mode(), PillMode::Start);
    assert!(!controller.state().workout_started);

    enter(&mut controller, 1, "45", "");
    controller.handle(Intent::Start);
    assert_eq!(controller.mode(), PillMode::Start);
}

#[test]
fn single_set_finish_shows_summary_and_saves_history() {
    let (mut controller, clock) = create_controller();
    enter(&mut controller, 1, "45", "10");
    assert!(controller.can_start());

    controller.handle(Intent::Start);
    assert_eq!(controller.mode(), PillMode::ActiveTimer);
    assert!(controller.state().workout_started);
    assert!(controller.selected_field().is_none());

    tick_workout(&mut controller, &clock, 65);
    assert_eq!(controller.elapsed_seconds(), 65);
    assert_eq!(controller.formatted_elapsed_time(), "1:05");

    controller.handle(Intent::Finish);
    assert_eq!(controller.mode(), PillMode::Start);
    assert!(controller.show_summary());
    assert!(!controller.state().workout_started);
    assert_eq!(controller.elapsed_seconds(), 0);
    assert_eq!(controller.current_set_index(), 0); // Cursor waits for StartNewWorkout
    assert!(controller.sets()[0].is_completed());
    assert_eq!(controller.sets()[0].completion_time(), "1:05");
    assert_eq!(controller.workout_timer(), None);

    let summary = controller.summary().expect("summary should be available");
    assert_eq!(summary.exercise_name, "Bench Press");
    assert_eq!(summary.sets.len(), 1);
    assert!((summary.total_volume() - 450.0).abs() < f64::EPSILON);

    let saved = controller.history().load_previous("Bench Press");
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].weight, "45");
    assert_eq!(saved[0].reps, "10");
    assert_eq!(saved[0].elapsed_time, "1:05");
}

#[test]
fn finishing_with_populated_next_set_advances_cursor() {
    let (mut controller, clock) = create_controller();
    enter(&mut controller, 1, "45", "10");
    enter(&mut controller, 2, "50", "8");

    controller.handle(Intent::Start);
    tick_workout(&mut controller, &clock, 3);
    controller.handle(Intent::Finish);

    assert!(controller.sets()[0].is_completed());
    assert_eq!(controller.current_set_index(), 1);
    assert_eq!(controller.mode(), PillMode::Start);
    assert!(!controller.show_summary());
    assert!(controller.summary().is_none());
    assert!(controller.can_start());
    assert!(controller.history().load_previous("Bench Press").is_empty());
}

#[test]
fn full_three_set_workout() {
    let (mut controller, clock) = create_controller();
    enter(&mut controller, 1, "45", "10");
    enter(&mut controller, 2, "50", "8");
    enter(&mut controller, 3, "55", "6");

    for expected_cursor in [1, 2] {
        controller.handle(Intent::Start);
        tick_workout(&mut controller, &clock, 30);
        controller.handle(Intent::Finish);
        assert_eq!(controller.current_set_index(), expected_cursor);
        assert!(!controller.show_summary());
    }

    controller.handle(Intent::Start);
    tick_workout(&mut controller, &clock, 5);
    controller.handle(Intent::Finish);
    assert!(controller.show_summary());
    assert_eq!(controller.current_set_index(), 2);

    let saved = controller.history().load_previous("Bench Press");
    assert_eq!(saved.len(), 3);
    assert_eq!(
        saved.iter().map(|s| s.elapsed_time.as_str()).collect::<Vec<_>>(),
        vec!["0:30", "0:30", "0:05"]
    );
}

#[test]
fn start_new_workout_resets_session_and_loads_previous() {
    let (mut controller, clock) = create_controller();
    enter(&mut controller, 1, "45", "10");
    controller.handle(Intent::Start);
    tick_workout(&mut controller, &clock, 10);
    controller.handle(Intent::Finish);
    assert!(controller.show_summary());

    controller.handle(Intent::StartNewWorkout);
    assert!(!controller.show_summary());
    assert!(controller.summary().is_none());
    assert_eq!(controller.mode(), PillMode::Start);
    assert_eq!(controller.current_set_index(), 0);
    assert!(controller.sets().iter().all(|s| !s.has_data() && !s.is_completed()));
    assert!(controller.selected_field().is_none());

    let previous = controller.previous_set(1).expect("previous set 1");
    assert_eq!(previous.weight, "45");
    assert_eq!(previous.elapsed_time, "0:10");
    assert!(controller.previous_set(2).is_none());
}

#[test]
fn previous_workout_is_loaded_on_create() {
    let mut history = WorkoutHistory::new(MemoryStore::new());
    let (mut first, clock) = create_controller();
    enter(&mut first, 1, "60", "5");
    first.handle(Intent::Start);
    tick_workout(&mut first, &clock, 2);
    first.handle(Intent::Finish);
    for entry in first.dispose().entries() {
        history.save(entry);
    }

    let controller = FlowController::new(settings(3), history, Box::new(test_clock()));
    assert_eq!(controller.previous_sets().len(), 1);
    assert_eq!(controller.previous_sets()[0].weight, "60");
}

#[test]
fn keyboard_editing_respects_filters() {
    let (mut controller, _) = create_controller();
    controller.handle(Intent::TapField(FieldSelection::new(2, Field::Reps)));
    assert_eq!(controller.mode(), PillMode::Keyboard);
    assert_eq!(controller.state().previous_mode, PillMode::Start);

    for ch in ['1', 'x', '2', '3', '4'] {
        controller.handle(Intent::KeyTap(ch));
    }
    assert_eq!(controller.ledger().value_for(2, Field::Reps), "123");

    controller.handle(Intent::Backspace);
    assert_eq!(controller.ledger().value_for(2, Field::Reps), "12");
}

#[test]
fn key_taps_outside_keyboard_mode_are_ignored() {
    let (mut controller, _) = create_controller();
    controller.handle(Intent::KeyTap('5'));
    controller.handle(Intent::Backspace);
    controller.handle(Intent::NextField);
    assert!(controller.sets().iter().all(|s| s.weight().is_empty()));
    assert!(controller.selected_field().is_none());
}

#[test]
fn next_field_wraps_from_last_to_first() {
    let (mut controller, _) = create_controller();
    controller.handle(Intent::TapField(FieldSelection::new(3, Field::Reps)));
    controller.handle(Intent::NextField);
    assert_eq!(
        controller.selected_field(),
        Some(FieldSelection::new(1, Field::Weight))
    );
}

#[test]
fn completed_fields_cannot_be_tapped() {
    let (mut controller, clock) = create_controller();
    enter(&mut controller, 1, "45", "10");
    enter(&mut controller, 2, "50", "8");
    controller.handle(Intent::Start);
    tick_workout(&mut controller, &clock, 1);
    controller.handle(Intent::Finish);

    controller.handle(Intent::TapField(FieldSelection::new(1, Field::Weight)));
    assert_eq!(controller.mode(), PillMode::Start);
    assert!(controller.selected_field().is_none());
}

#[test]
fn dismissing_keyboard_returns_to_active_timer() {
    let (mut controller, _) = create_controller();
    enter(&mut controller, 1, "45", "10");
    controller.handle(Intent::Start);

    controller.handle(Intent::TapField(FieldSelection::new(2, Field::Weight)));
    assert_eq!(controller.state().previous_mode, PillMode::ActiveTimer);
    controller.handle(Intent::DismissKeyboard);
    assert_eq!(controller.mode(), PillMode::ActiveTimer);
    assert!(controller.selected_field().is_none());
}

#[test]
fn double_keyboard_entry_falls_back_on_workout_state() {
    let (mut controller, _) = create_controller();
    controller.handle(Intent::TapField(FieldSelection::new(1, Field::Weight)));
    controller.handle(Intent::TapField(FieldSelection::new(2, Field::Weight)));
    assert_eq!(controller.state().previous_mode, PillMode::Keyboard);
    controller.handle(Intent::DismissKeyboard);
    assert_eq!(controller.mode(), PillMode::Start);

    enter(&mut controller, 1, "45", "10");
    controller.handle(Intent::Start);
    controller.handle(Intent::TapField(FieldSelection::new(2, Field::Weight)));
    controller.handle(Intent::TapField(FieldSelection::new(2, Field::Reps)));
    controller.handle(Intent::DismissKeyboard);
    assert_eq!(controller.mode(), PillMode::ActiveTimer);
}

#[test]
fn rest_countdown_runs_to_zero_then_restores() {
    let (mut controller, _) = create_controller();
    enter(&mut controller, 1, "45", "10");
    controller.handle(Intent::Start);

    controller.handle(Intent::TapTimerIcon);
    assert_eq!(controller.mode(), PillMode::RestPicker);
    controller.handle(Intent::PickRest(3));
    assert_eq!(controller.mode(), PillMode::Countdown);
    assert!(controller.is_rest_active());
    assert_eq!(controller.rest_duration_seconds(), 3);

    let token = controller.rest_timer().expect("rest timer should be live");
    for expected in [2, 1, 0] {
        controller.handle(Intent::Tick(token));
        assert_eq!(controller.rest_remaining_seconds(), expected);
        assert_eq!(controller.mode(), PillMode::Countdown);
    }
    controller.handle(Intent::Tick(token));
    assert_eq!(controller.mode(), PillMode::ActiveTimer);
    assert!(!controller.is_rest_active());
    assert_eq!(controller.rest_timer(), None);
}

#[test]
fn skip_rest_stops_timer_and_restores() {
    let (mut controller, _) = create_controller();
    enter(&mut controller, 1, "45", "10");
    controller.handle(Intent::Start);
    controller.handle(Intent::TapTimerIcon);
    controller.handle(Intent::PickRest(60));
    let token = controller.rest_timer().expect("rest timer should be live");

    controller.handle(Intent::SkipRest);
    assert_eq!(controller.mode(), PillMode::ActiveTimer);
    assert!(!controller.is_rest_active());

    // Late tick from the cancelled run changes nothing.
    controller.handle(Intent::Tick(token));
    assert_eq!(controller.rest_remaining_seconds(), 0);
    assert_eq!(controller.mode(), PillMode::ActiveTimer);
}

#[test]
fn dismissing_rest_picker_restores_previous_mode() {
    let (mut controller, _) = create_controller();
    enter(&mut controller, 1, "45", "10");
    controller.handle(Intent::Start);
    controller.handle(Intent::TapTimerIcon);
    controller.handle(Intent::DismissRestPicker);
    assert_eq!(controller.mode(), PillMode::ActiveTimer);
    assert!(!controller.is_rest_active());
}

#[test]
fn rest_picker_from_keyboard_keeps_selection() {
    let (mut controller, _) = create_controller();
    controller.handle(Intent::TapField(FieldSelection::new(1, Field::Reps)));
    controller.handle(Intent::TapTimerIcon);
    assert_eq!(controller.mode(), PillMode::RestPicker);
    assert_eq!(
        controller.selected_field(),
        Some(FieldSelection::new(1, Field::Reps))
    );

    controller.handle(Intent::DismissRestPicker);
    assert_eq!(controller.mode(), PillMode::Keyboard);
    controller.handle(Intent::KeyTap('9'));
    assert_eq!(controller.ledger().value_for(1, Field::Reps), "9");
}

#[test]
fn field_tap_from_rest_picker_returns_to_the_timer() {
    let (mut controller, _) = create_controller();
    enter(&mut controller, 1, "45", "10");
    controller.handle(Intent::Start);
    controller.handle(Intent::TapTimerIcon);
    controller.handle(Intent::TapField(FieldSelection::new(2, Field::Weight)));
    assert_eq!(controller.mode(), PillMode::Keyboard);
    assert_eq!(controller.state().previous_mode, PillMode::ActiveTimer);

    controller.handle(Intent::DismissKeyboard);
    assert_eq!(controller.mode(), PillMode::ActiveTimer);

    // Picker intents no longer apply once the picker is gone.
    controller.handle(Intent::DismissRestPicker);
    controller.handle(Intent::PickRest(30));
    controller.handle(Intent::SkipRest);
    assert_eq!(controller.mode(), PillMode::ActiveTimer);
    assert_eq!(controller.rest_timer(), None);

    controller.handle(Intent::Finish);
    assert!(controller.sets()[0].is_completed());
    assert!(controller.show_summary());
    assert_eq!(controller.mode(), PillMode::Start);
}

#[test]
fn field_tap_from_keyboard_picker_falls_back_on_dismiss() {
    let (mut controller, _) = create_controller();
    enter(&mut controller, 1, "45", "10");
    controller.handle(Intent::Start);
    controller.handle(Intent::TapField(FieldSelection::new(1, Field::Reps)));
    controller.handle(Intent::TapTimerIcon);
    controller.handle(Intent::TapField(FieldSelection::new(2, Field::Weight)));
    assert_eq!(controller.state().previous_mode, PillMode::Keyboard);

    controller.handle(Intent::DismissKeyboard);
    assert_eq!(controller.mode(), PillMode::ActiveTimer);
    assert_eq!(controller.selected_field(), None);
}

#[test]
fn field_tap_from_rest_picker_before_start_returns_to_start() {
    let (mut controller, _) = create_controller();
    controller.handle(Intent::TapField(FieldSelection::new(1, Field::Weight)));
    controller.handle(Intent::TapTimerIcon);
    assert_eq!(controller.mode(), PillMode::RestPicker);
    controller.handle(Intent::TapField(FieldSelection::new(1, Field::Reps)));

    controller.handle(Intent::DismissKeyboard);
    assert_eq!(controller.mode(), PillMode::Start);
}

#[test]
fn keyboard_over_countdown_falls_back_after_rest_expires() {
    let (mut controller, _) = create_controller();
    enter(&mut controller, 1, "45", "10");
    controller.handle(Intent::Start);
    controller.handle(Intent::TapTimerIcon);
    controller.handle(Intent::PickRest(1));
    let rest = controller.rest_timer().expect("rest should be live");

    controller.handle(Intent::TapField(FieldSelection::new(2, Field::Weight)));
    assert_eq!(controller.mode(), PillMode::Keyboard);
    assert_eq!(controller.state().previous_mode, PillMode::Countdown);

    controller.handle(Intent::Tick(rest));
    assert_eq!(controller.rest_remaining_seconds(), 0);
    controller.handle(Intent::Tick(rest));
    assert!(!controller.is_rest_active());
    assert_eq!(controller.mode(), PillMode::Keyboard);

    controller.handle(Intent::DismissKeyboard);
    assert_eq!(controller.mode(), PillMode::ActiveTimer);
}

#[test]
fn timer_icon_is_ignored_in_start_mode() {
    let (mut controller, _) = create_controller();
    controller.handle(Intent::TapTimerIcon);
    assert_eq!(controller.mode(), PillMode::Start);
    controller.handle(Intent::PickRest(30));
    assert_eq!(controller.mode(), PillMode::Start);
    assert_eq!(controller.rest_timer(), None);
}

#[test]
fn repicking_rest_replaces_the_running_timer() {
    let (mut controller, _) = create_controller();
    enter(&mut controller, 1, "45", "10");
    controller.handle(Intent::Start);
    controller.handle(Intent::TapTimerIcon);
    controller.handle(Intent::PickRest(30));
    let first = controller.rest_timer().expect("first rest");

    // Keyboard over the countdown, then the picker again from the keyboard.
    controller.handle(Intent::TapField(FieldSelection::new(2, Field::Weight)));
    controller.handle(Intent::TapTimerIcon);
    controller.handle(Intent::PickRest(90));
    let second = controller.rest_timer().expect("second rest");
    assert_ne!(first, second);

    controller.handle(Intent::Tick(first));
    assert_eq!(controller.rest_remaining_seconds(), 90);
    controller.handle(Intent::Tick(second));
    assert_eq!(controller.rest_remaining_seconds(), 89);
}

#[test]
fn finish_stops_an_active_rest() {
    let (mut controller, _) = create_controller();
    enter(&mut controller, 1, "45", "10");
    enter(&mut controller, 2, "50", "8");
    controller.handle(Intent::Start);

    // Countdown -> keyboard -> keyboard -> dismiss lands on ActiveTimer with rest running.
    controller.handle(Intent::TapTimerIcon);
    controller.handle(Intent::PickRest(60));
    controller.handle(Intent::TapField(FieldSelection::new(3, Field::Weight)));
    controller.handle(Intent::TapField(FieldSelection::new(3, Field::Reps)));
    controller.handle(Intent::DismissKeyboard);
    assert_eq!(controller.mode(), PillMode::ActiveTimer);
    assert!(controller.is_rest_active());

    controller.handle(Intent::Finish);
    assert!(!controller.is_rest_active());
    assert_eq!(controller.rest_timer(), None);
    assert_eq!(controller.current_set_index(), 1);
}

#[test]
fn stale_workout_ticks_are_dropped_after_finish() {
    let (mut controller, clock) = create_controller();
    enter(&mut controller, 1, "45", "10");
    enter(&mut controller, 2, "50", "8");
    controller.handle(Intent::Start);
    let token = controller.workout_timer().expect("workout timer");
    controller.handle(Intent::Finish);

    clock.advance_secs(30);
    controller.handle(Intent::Tick(token));
    assert_eq!(controller.elapsed_seconds(), 0);
}

#[test]
fn elapsed_time_follows_the_clock_not_the_tick_count() {
    let (mut controller, clock) = create_controller();
    enter(&mut controller, 1, "45", "10");
    controller.handle(Intent::Start);
    let token = controller.workout_timer().expect("workout timer");

    clock.advance_secs(3661);
    controller.handle(Intent::Tick(token));
    assert_eq!(controller.formatted_elapsed_time(), "61:01");
}

#[test]
fn finish_outside_active_timer_is_ignored() {
    let (mut controller, _) = create_controller();
    enter(&mut controller, 1, "45", "10");
    controller.handle(Intent::Finish);
    assert!(!controller.sets()[0].is_completed());
    assert_eq!(controller.mode(), PillMode::Start);
}

#[test]
fn dispose_returns_history() {
    let (mut controller, clock) = create_controller();
    enter(&mut controller, 1, "45", "10");
    controller.handle(Intent::Start);
    tick_workout(&mut controller, &clock, 1);
    controller.handle(Intent::Finish);

    let history = controller.dispose();
    assert_eq!(history.entries().len(), 1);
    assert!(history.store().raw(HISTORY_KEY).is_some());
}
