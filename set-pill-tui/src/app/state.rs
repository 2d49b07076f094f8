// set-pill-tui/src/app/state.rs
use ratatui::style::Color;
use std::time::Instant;
use tracing::info;

use set_pill_lib::{parse_color, Config, PillController, StandardColor, Units};

use super::tick::TickScheduler;

// Overlays that are not part of the pill itself
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveModal {
    None,
    Help,
}

pub struct App {
    pub controller: PillController,
    pub units: Units,
    pub header_color: Color,
    pub active_modal: ActiveModal,
    pub should_quit: bool,
    pub ticks: TickScheduler,
}

impl App {
    pub fn new(controller: PillController, config: &Config) -> Self {
        let header_color = parse_color(&config.theme.header_color)
            .map(to_tui_color)
            .unwrap_or(Color::Green); // Fallback
        Self {
            controller,
            units: config.units,
            header_color,
            active_modal: ActiveModal::None,
            should_quit: false,
            ticks: TickScheduler::new(),
        }
    }

    /// Feeds any timer ticks due at `now` into the controller.
    pub fn on_tick(&mut self, now: Instant) {
        let due = self.ticks.due(
            self.controller.workout_timer(),
            self.controller.rest_timer(),
            now,
        );
        for intent in due {
            self.controller.handle(intent);
        }
    }

    /// Stops the timers and releases the history store.
    pub fn shutdown(self) {
        drop(self.controller.dispose());
        info!("pill-tui stopped");
    }
}

fn to_tui_color(color: StandardColor) -> Color {
    match color {
        StandardColor::Black => Color::Black,
        StandardColor::Red => Color::Red,
        StandardColor::Green => Color::Green,
        StandardColor::Yellow => Color::Yellow,
        StandardColor::Blue => Color::Blue,
        StandardColor::Magenta => Color::Magenta,
        StandardColor::Cyan => Color::Cyan,
        StandardColor::White => Color::White,
        StandardColor::DarkGrey => Color::DarkGray,
        StandardColor::Grey => Color::Gray,
    }
}
