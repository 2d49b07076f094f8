// set-pill-tui/src/ui/layout.rs
use crate::{
    app::{ActiveModal, App},
    ui::{
        modals::{render_help_modal, render_rest_picker_modal, render_summary_modal},
        pill::render_pill,
        sets_table::render_sets_table,
        status_bar::render_status_bar,
    },
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::Paragraph,
    Frame,
};
use set_pill_lib::PillMode;

pub fn render_ui(f: &mut Frame, app: &App) {
    let size = f.size();

    // Exercise title, sets, pill, status bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(size);

    let title = Paragraph::new(app.controller.exercise_name())
        .style(
            Style::default()
                .fg(app.header_color)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, main_chunks[0]);

    render_sets_table(f, app, main_chunks[1]);
    render_pill(f, app, main_chunks[2]);
    render_status_bar(f, app, main_chunks[3]);

    // Overlays last, most important on top
    if app.controller.mode() == PillMode::RestPicker {
        render_rest_picker_modal(f, app);
    }
    if app.controller.show_summary() {
        render_summary_modal(f, app);
    }
    if app.active_modal == ActiveModal::Help {
        render_help_modal(f);
    }
}

/// Helper function to create a centered rectangle for modals
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let percent_x = percent_x.min(100);
    let percent_y = percent_y.min(100);
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
