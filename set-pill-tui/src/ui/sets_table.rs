// set-pill-tui/src/ui/sets_table.rs
use crate::app::App;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};
use set_pill_lib::{Field, FieldSelection, PillMode, SetRecord};

pub fn render_sets_table(f: &mut Frame, app: &App, area: Rect) {
    let controller = &app.controller;
    let header_style = Style::default()
        .fg(app.header_color)
        .add_modifier(Modifier::BOLD);
    let weight_header = format!("Weight ({})", app.units.weight_label());
    let header = Row::new(vec![
        Cell::from("Set"),
        Cell::from("Previous"),
        Cell::from(weight_header),
        Cell::from("Reps"),
        Cell::from("Time"),
    ])
    .style(header_style)
    .height(1)
    .bottom_margin(1);

    let selected = match controller.mode() {
        // Selection survives under the rest picker but is only drawn while typing
        PillMode::Keyboard => controller.selected_field(),
        _ => None,
    };
    let current_index = controller.current_set_index();

    let rows = controller.sets().iter().enumerate().map(|(index, record)| {
        let previous = controller
            .previous_set(record.set_number())
            .map_or_else(|| "-".to_string(), |p| format!("{} × {}", p.weight, p.reps));

        let row_style = if record.is_completed() {
            Style::default().fg(Color::DarkGray)
        } else if index == current_index {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        Row::new(vec![
            Cell::from(record.set_number().to_string()),
            Cell::from(previous).style(Style::default().fg(Color::DarkGray)),
            field_cell(record, Field::Weight, selected),
            field_cell(record, Field::Reps, selected),
            Cell::from(if record.is_completed() {
                format!("✓ {}", record.completion_time())
            } else {
                String::new()
            }),
        ])
        .style(row_style)
    });

    let widths = [
        Constraint::Length(5),
        Constraint::Percentage(30),
        Constraint::Percentage(20),
        Constraint::Percentage(20),
        Constraint::Min(8),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Sets"));

    f.render_widget(table, area);
}

fn field_cell(record: &SetRecord, field: Field, selected: Option<FieldSelection>) -> Cell<'static> {
    let is_selected = selected == Some(FieldSelection::new(record.set_number(), field));
    let value = record.value(field);
    let text = match (value.is_empty(), is_selected) {
        (true, true) => "_".to_string(),
        (true, false) => "·".to_string(),
        (false, true) => format!("{value}_"),
        (false, false) => value.to_string(),
    };
    let style = if is_selected {
        Style::default().fg(Color::Black).bg(Color::Yellow)
    } else {
        Style::default()
    };
    Cell::from(text).style(style)
}
