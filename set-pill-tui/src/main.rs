// set-pill-tui/src/main.rs
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    fs::OpenOptions,
    io,
    path::Path,
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use set_pill_lib::{AppService, SystemClock};

mod app;
mod ui;

use crate::app::App;

const LOG_ENV_VAR: &str = "PILL_LOG";
const LOG_FILE_NAME: &str = "pill-tui.log";
const POLL_INTERVAL: Duration = Duration::from_millis(250);

fn main() -> Result<()> {
    let service = AppService::initialize().context("Failed to initialize AppService")?;
    // The terminal is ours from here on, so logs go next to the database.
    init_logging(&service.get_db_path().with_file_name(LOG_FILE_NAME))?;
    info!(exercise = %service.config.exercise_name, "starting pill-tui");

    let (config, controller) = service.into_controller(Box::new(SystemClock));
    let mut app = App::new(controller, &config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.shutdown();

    if let Err(err) = res {
        error!(error = ?err, "pill-tui exited with an error");
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn init_logging(log_path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file {log_path:?}"))?;
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        // Timer ticks are delivered on this thread before each frame
        app.on_tick(Instant::now());

        terminal.draw(|f| ui::render_ui(f, app))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key_event(key)?;
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
