// set-pill-tui/src/app/mod.rs
mod input;
mod state;
mod tick;

pub use state::{ActiveModal, App};
