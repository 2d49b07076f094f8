// set-pill-tui/src/ui/modals.rs
use crate::{app::App, ui::layout::centered_rect};
use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};
use set_pill_lib::format_duration;

pub fn render_help_modal(f: &mut Frame) {
    let block = Block::default()
        .title("Help (?)")
        .borders(Borders::ALL)
        .title_style(Style::new().bold())
        .border_style(Style::new().yellow());
    let area = centered_rect(60, 70, f.size());
    f.render_widget(Clear, area);

    let help_text = vec![
        Line::from("--- Pill ---").style(Style::new().bold().underlined()),
        Line::from(" s: Start the set / Finish the running set"),
        Line::from(" e: Edit the current set"),
        Line::from(" t: Pick a rest duration"),
        Line::from(" x: Skip the running rest"),
        Line::from(" n: Start a new workout"),
        Line::from(""),
        Line::from("--- Editing ---").style(Style::new().bold().underlined()),
        Line::from(" 0-9 .: Type into the field"),
        Line::from(" Backspace: Delete last character"),
        Line::from(" Tab: Next field"),
        Line::from(" Esc/Enter: Done"),
        Line::from(""),
        Line::from("--- Global ---").style(Style::new().bold().underlined()),
        Line::from(" ?: Show/Hide This Help"),
        Line::from(" q: Quit"),
    ];
    let paragraph = Paragraph::new(help_text).block(block);
    f.render_widget(paragraph, area);
}

pub fn render_rest_picker_modal(f: &mut Frame, app: &App) {
    let block = Block::default()
        .title("Rest")
        .borders(Borders::ALL)
        .border_style(Style::new().cyan());
    let area = centered_rect(30, 50, f.size());
    f.render_widget(Clear, area);

    let items: Vec<ListItem> = app
        .controller
        .rest_presets()
        .iter()
        .take(9)
        .enumerate()
        .map(|(i, &seconds)| {
            ListItem::new(format!(" [{}] {}", i + 1, format_duration(u64::from(seconds))))
        })
        .collect();

    let inner = block.inner(area);
    f.render_widget(block, area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    f.render_widget(List::new(items), chunks[0]);
    f.render_widget(
        Paragraph::new("[Esc] Cancel").alignment(Alignment::Center),
        chunks[1],
    );
}

pub fn render_summary_modal(f: &mut Frame, app: &App) {
    let Some(summary) = app.controller.summary() else {
        return;
    };
    let block = Block::default()
        .title("Workout Complete")
        .borders(Borders::ALL)
        .title_style(Style::new().bold())
        .border_style(Style::new().fg(app.header_color));
    let area = centered_rect(60, 60, f.size());
    f.render_widget(Clear, area);

    let unit = app.units.weight_label();
    let mut lines = vec![
        Line::from(summary.exercise_name.clone()).style(Style::new().add_modifier(Modifier::BOLD)),
        Line::from(
            summary
                .completed_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
        ),
        Line::from(""),
    ];
    lines.extend(summary.sets.iter().map(|set| {
        Line::from(format!(
            " Set {}: {} {unit} × {}   {}",
            set.set_number, set.weight, set.reps, set.elapsed_time
        ))
    }));
    lines.push(Line::from(""));
    lines.push(Line::from(format!(
        " Total volume: {:.1} {unit}",
        summary.total_volume()
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(" [n/Enter] New workout   [q] Quit").style(Style::new().italic()));

    f.render_widget(Paragraph::new(lines).block(block), area);
}
