// set-pill-tui/src/app/input.rs
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use set_pill_lib::{accepts_char, Field, FieldSelection, Intent, PillMode};

use super::state::{ActiveModal, App};

impl App {
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Ok(());
        }

        if self.active_modal == ActiveModal::Help {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.active_modal = ActiveModal::None;
            }
            return Ok(());
        }

        // The summary covers the pill until a new workout begins
        if self.controller.show_summary() {
            match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('n') | KeyCode::Enter => {
                    self.controller.handle(Intent::StartNewWorkout);
                }
                _ => {}
            }
            return Ok(());
        }

        if let Some(intent) = self.intent_for_key(key) {
            self.controller.handle(intent);
            return Ok(());
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.active_modal = ActiveModal::Help,
            _ => {}
        }
        Ok(())
    }

    /// Maps a key press to the intent it stands for in the current pill mode.
    fn intent_for_key(&self, key: KeyEvent) -> Option<Intent> {
        let mode = self.controller.mode();
        match (mode, key.code) {
            (PillMode::Keyboard, KeyCode::Char(ch)) if accepts_char(ch) => Some(Intent::KeyTap(ch)),
            (PillMode::Keyboard, KeyCode::Backspace) => Some(Intent::Backspace),
            (PillMode::Keyboard, KeyCode::Tab) => Some(Intent::NextField),
            (PillMode::Keyboard, KeyCode::Esc | KeyCode::Enter) => Some(Intent::DismissKeyboard),

            (PillMode::RestPicker, KeyCode::Char(ch)) => ch
                .to_digit(10)
                .and_then(|n| usize::try_from(n).ok()?.checked_sub(1))
                .and_then(|i| self.controller.rest_presets().get(i).copied())
                .map(Intent::PickRest),
            (PillMode::RestPicker, KeyCode::Esc) => Some(Intent::DismissRestPicker),

            (PillMode::Start, KeyCode::Char('s')) => Some(Intent::Start),
            (PillMode::ActiveTimer, KeyCode::Char('s')) => Some(Intent::Finish),
            (PillMode::ActiveTimer | PillMode::Keyboard, KeyCode::Char('t')) => {
                Some(Intent::TapTimerIcon)
            }
            (PillMode::Countdown, KeyCode::Char('x')) => Some(Intent::SkipRest),
            (PillMode::Start | PillMode::ActiveTimer | PillMode::Countdown, KeyCode::Char('e')) => {
                Some(Intent::TapField(self.edit_target()))
            }
            (PillMode::Start | PillMode::ActiveTimer | PillMode::Countdown, KeyCode::Char('n')) => {
                Some(Intent::StartNewWorkout)
            }
            _ => None,
        }
    }

    // Weight of the active set, or of the last set once all are used up
    fn edit_target(&self) -> FieldSelection {
        let set_count = self.controller.sets().len();
        let set_number = (self.controller.current_set_index() + 1).min(set_count);
        FieldSelection::new(set_number, Field::Weight)
    }
}
