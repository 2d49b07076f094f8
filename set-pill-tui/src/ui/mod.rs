mod layout;
mod modals;
mod pill;
mod sets_table;
mod status_bar;

pub use layout::render_ui;
