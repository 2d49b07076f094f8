// set-pill-lib/src/lib.rs
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

// --- Declare modules ---
mod config;
pub mod db;
pub mod flow;
mod format;
pub mod history;
pub mod ledger;
pub mod timer;

// --- Expose public types ---
pub use config::{
    get_config_path as get_config_path_util, load as load_config_util, parse_color,
    save as save_config_util, Config, ConfigError, StandardColor, Theme, Units, MAX_SET_COUNT,
};
pub use db::{get_db_path as get_db_path_util, DbError, KeyValueStore, MemoryStore, SqliteStore};
pub use flow::{FlowController, FlowState, Intent, PillMode, SessionSettings, WorkoutSummary};
pub use format::format_duration;
pub use history::{
    CompletedSet, HistoryStore, WorkoutHistory, WorkoutHistoryEntry, HISTORY_CAPACITY,
    HISTORY_KEY,
};
pub use ledger::{accepts_char, Field, FieldSelection, SetLedger, SetRecord, MAX_FIELD_LEN};
pub use timer::{Clock, ManualClock, SystemClock, TimerKind, TimerToken};

/// Controller wired to the on-disk history, as used by the TUI.
pub type PillController = FlowController<WorkoutHistory<SqliteStore>>;

pub struct AppService {
    pub config: Config,
    pub history: WorkoutHistory<SqliteStore>,
    pub db_path: PathBuf,
    pub config_path: PathBuf,
}

impl AppService {
    /// Loads config and opens the history database from their default locations.
    /// # Errors
    /// Returns `anyhow::Error` if path determination, loading, or initialization fails.
    pub fn initialize() -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let db_path = db::get_db_path().context("Failed to determine database path")?;
        Self::with_paths(config_path, db_path)
    }

    /// Same as `initialize`, with explicit file locations.
    /// # Errors
    /// Returns `anyhow::Error` if the config is invalid or the database cannot be opened.
    pub fn with_paths(config_path: PathBuf, db_path: PathBuf) -> Result<Self> {
        let config = config::load(&config_path)
            .with_context(|| format!("Failed to load config from {config_path:?}"))?;
        let store = SqliteStore::open(&db_path)
            .with_context(|| format!("Failed to open database at {db_path:?}"))?;
        info!(?config_path, ?db_path, "service initialized");

        Ok(Self {
            config,
            history: WorkoutHistory::new(store),
            db_path,
            config_path,
        })
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn get_db_path(&self) -> &Path {
        &self.db_path
    }

    /// # Errors
    /// Returns `ConfigError` if saving fails.
    pub fn save_config(&self) -> Result<(), ConfigError> {
        config::save(&self.config_path, &self.config)
    }

    /// # Errors
    /// - `ConfigError::EmptyExerciseName` if `name` is blank.
    /// - `ConfigError` variants if saving fails.
    pub fn set_exercise_name(&mut self, name: &str) -> Result<(), ConfigError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyExerciseName);
        }
        self.config.exercise_name = trimmed.to_string();
        self.save_config()
    }

    /// # Errors
    /// - `ConfigError::InvalidSetCount` if `count` is outside `1..=MAX_SET_COUNT`.
    /// - `ConfigError` variants if saving fails.
    pub fn set_set_count(&mut self, count: usize) -> Result<(), ConfigError> {
        if !(1..=MAX_SET_COUNT).contains(&count) {
            return Err(ConfigError::InvalidSetCount(count));
        }
        self.config.set_count = count;
        self.save_config()
    }

    /// Replaces the rest picker presets; they are stored sorted and deduplicated.
    /// # Errors
    /// - `ConfigError::InvalidRestPreset` if any preset is zero.
    /// - `ConfigError` variants if saving fails.
    pub fn set_rest_presets(&mut self, presets: &[u32]) -> Result<(), ConfigError> {
        if let Some(&bad) = presets.iter().find(|&&s| s == 0) {
            return Err(ConfigError::InvalidRestPreset(bad));
        }
        let mut presets = presets.to_vec();
        presets.sort_unstable();
        presets.dedup();
        self.config.rest_presets = presets;
        self.save_config()
    }

    /// # Errors
    /// - `ConfigError::InvalidColor` if the name is not a known color.
    /// - `ConfigError` variants if saving fails.
    pub fn set_header_color(&mut self, color: &str) -> Result<(), ConfigError> {
        let parsed = parse_color(color)?;
        self.config.theme.header_color = parsed.to_string();
        self.save_config()
    }

    /// # Errors
    /// Returns `ConfigError` variants if saving fails.
    pub fn set_units(&mut self, units: Units) -> Result<(), ConfigError> {
        self.config.units = units;
        self.save_config()
    }

    /// Retained workouts, newest first, optionally filtered by exact exercise name.
    pub fn list_history(
        &self,
        exercise_name: Option<&str>,
        limit: Option<usize>,
    ) -> Vec<WorkoutHistoryEntry> {
        self.history
            .entries()
            .into_iter()
            .rev()
            .filter(|e| exercise_name.map_or(true, |name| e.exercise_name == name))
            .take(limit.unwrap_or(usize::MAX))
            .collect()
    }

    /// Sets of the most recent workout for `exercise_name`.
    pub fn previous_sets(&self, exercise_name: &str) -> Vec<CompletedSet> {
        self.history.load_previous(exercise_name)
    }

    /// # Errors
    /// Returns `DbError` if the history cannot be removed.
    pub fn clear_history(&mut self) -> Result<(), DbError> {
        self.history.clear()
    }

    /// Hands the history to a new controller for the configured exercise.
    /// The config is returned alongside for presentation settings.
    pub fn into_controller(self, clock: Box<dyn Clock>) -> (Config, PillController) {
        let settings = SessionSettings::from(&self.config);
        let controller = FlowController::new(settings, self.history, clock);
        (self.config, controller)
    }
}
