// set-pill-tui/src/ui/pill.rs
use crate::app::App;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, Paragraph},
    Frame,
};
use set_pill_lib::PillMode;

/// Draws the pill for the current mode.
pub fn render_pill(f: &mut Frame, app: &App, area: Rect) {
    let controller = &app.controller;
    let set_number = controller.current_set_index() + 1;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);

    match controller.mode() {
        PillMode::Start => {
            let (label, color) = if controller.can_start() {
                (format!("▶ Start set {set_number}  [s]"), Color::Green)
            } else {
                (
                    format!("Enter weight and reps for set {set_number}  [e]"),
                    Color::DarkGray,
                )
            };
            let block = block.border_style(Style::default().fg(color));
            let pill = Paragraph::new(label)
                .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center)
                .block(block);
            f.render_widget(pill, area);
        }
        PillMode::ActiveTimer => {
            let mut spans = vec![
                Span::styled(
                    format!("⏱ {}", controller.formatted_elapsed_time()),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("   Set {set_number}   [s] finish  [t] rest")),
            ];
            if controller.is_rest_active() {
                spans.push(Span::styled(
                    format!("   rest {}", controller.formatted_rest_remaining()),
                    Style::default().fg(Color::Cyan),
                ));
            }
            let pill = Paragraph::new(Line::from(spans))
                .alignment(Alignment::Center)
                .block(block.border_style(Style::default().fg(Color::Yellow)));
            f.render_widget(pill, area);
        }
        PillMode::Keyboard => {
            let label = controller.selected_field().map_or_else(
                || "Editing".to_string(),
                |sel| format!("Set {} · {}", sel.set_number, sel.field),
            );
            let pill = Paragraph::new(format!(
                "{label}   [0-9 .] type  [⌫] delete  [Tab] next  [Enter] done"
            ))
            .alignment(Alignment::Center)
            .block(block.border_style(Style::default().fg(Color::Blue)));
            f.render_widget(pill, area);
        }
        PillMode::RestPicker => {
            // The picker itself is a modal; the pill just names it
            let pill = Paragraph::new("Choose a rest duration")
                .alignment(Alignment::Center)
                .block(block.border_style(Style::default().fg(Color::Cyan)));
            f.render_widget(pill, area);
        }
        PillMode::Countdown => {
            let total = controller.rest_duration_seconds().max(1);
            let ratio = f64::from(controller.rest_remaining_seconds()) / f64::from(total);
            let gauge = Gauge::default()
                .block(
                    block
                        .title(" Rest  [x] skip ")
                        .border_style(Style::default().fg(Color::Cyan)),
                )
                .gauge_style(Style::default().fg(Color::Cyan))
                .ratio(ratio.clamp(0.0, 1.0))
                .label(controller.formatted_rest_remaining());
            f.render_widget(gauge, area);
        }
    }
}
