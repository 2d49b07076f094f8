// set-pill-tui/src/ui/status_bar.rs
use crate::app::{ActiveModal, App};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use set_pill_lib::PillMode;

pub fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let controller = &app.controller;
    let status_text = match app.active_modal {
        ActiveModal::Help => " [Esc/Enter/?] Close Help ",
        ActiveModal::None if controller.show_summary() => " [n/Enter] New workout | [Q]uit ",
        ActiveModal::None => match controller.mode() {
            PillMode::Start => " [s]tart | [e]dit | [n]ew workout | [?] Help | [Q]uit ",
            PillMode::ActiveTimer => " [s] Finish | [t] Rest | [e]dit | [?] Help | [Q]uit ",
            PillMode::Keyboard => " [0-9 .] Type | [Tab] Next | [Esc/Enter] Done | [t] Rest ",
            PillMode::RestPicker => " [1-9] Pick | [Esc] Cancel ",
            PillMode::Countdown => " [x] Skip rest | [e]dit | [?] Help | [Q]uit ",
        },
    };

    let status_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(80), Constraint::Percentage(20)])
        .split(area);

    let status_paragraph =
        Paragraph::new(status_text).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(status_paragraph, status_chunks[0]);

    // Workout clock stays visible while overlays cover the pill
    let clock_text = if controller.state().workout_started {
        format!("⏱ {} ", controller.formatted_elapsed_time())
    } else {
        String::new()
    };
    let clock_paragraph = Paragraph::new(clock_text)
        .style(Style::default().bg(Color::DarkGray).fg(Color::Yellow))
        .alignment(Alignment::Right);
    f.render_widget(clock_paragraph, status_chunks[1]);
}
