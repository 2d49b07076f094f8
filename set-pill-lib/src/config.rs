// set-pill-lib/src/config.rs
use comfy_table::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

use crate::ledger::DEFAULT_SET_COUNT;

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_CONFIG_DIR: &str = "set-pill";
const CONFIG_ENV_VAR: &str = "PILL_CONFIG_DIR"; // Overrides the platform config dir

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine configuration directory.")]
    CannotDetermineConfigDir,
    #[error("I/O error accessing config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file (TOML): {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Failed to serialize config data (TOML): {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Invalid color name: {0}")]
    InvalidColor(String),
    #[error("Exercise name cannot be empty.")]
    EmptyExerciseName,
    #[error("Set count {0} is out of range (expected 1 to {}).", MAX_SET_COUNT)]
    InvalidSetCount(usize),
    #[error("Rest presets must be positive durations in seconds, got {0}.")]
    InvalidRestPreset(u32),
}

/// Upper bound for sets per session; keeps the flat field ring small.
pub const MAX_SET_COUNT: usize = 20;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric, // kg
    Imperial, // lbs
}

impl Units {
    pub const fn weight_label(self) -> &'static str {
        match self {
            Self::Metric => "kg",
            Self::Imperial => "lbs",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum StandardColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    DarkGrey,
    Grey,
}

impl From<StandardColor> for Color {
    fn from(value: StandardColor) -> Self {
        match value {
            StandardColor::Black => Self::Black,
            StandardColor::Red => Self::Red,
            StandardColor::Green => Self::Green,
            StandardColor::Yellow => Self::Yellow,
            StandardColor::Blue => Self::Blue,
            StandardColor::Magenta => Self::Magenta,
            StandardColor::Cyan => Self::Cyan,
            StandardColor::White => Self::White,
            StandardColor::DarkGrey => Self::DarkGrey,
            StandardColor::Grey => Self::Grey,
        }
    }
}

/// Parses a case-insensitive color name such as `"green"` or `"DarkGrey"`.
/// # Errors
/// Returns `ConfigError::InvalidColor` for unknown names.
pub fn parse_color(color_str: &str) -> Result<StandardColor, ConfigError> {
    StandardColor::from_str(color_str.trim())
        .map_err(|_| ConfigError::InvalidColor(color_str.to_string()))
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Theme {
    pub header_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            header_color: "Green".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)] // Missing fields fall back to defaults
pub struct Config {
    pub exercise_name: String,
    pub set_count: usize,
    pub rest_presets: Vec<u32>, // Seconds, offered by the rest picker
    pub units: Units,
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exercise_name: "Bench Press".to_string(),
            set_count: DEFAULT_SET_COUNT,
            rest_presets: vec![30, 60, 90, 120],
            units: Units::default(),
            theme: Theme::default(),
        }
    }
}

impl Config {
    /// # Errors
    /// Returns the first `ConfigError` describing an unusable setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exercise_name.trim().is_empty() {
            return Err(ConfigError::EmptyExerciseName);
        }
        if !(1..=MAX_SET_COUNT).contains(&self.set_count) {
            return Err(ConfigError::InvalidSetCount(self.set_count));
        }
        if let Some(&bad) = self.rest_presets.iter().find(|&&s| s == 0) {
            return Err(ConfigError::InvalidRestPreset(bad));
        }
        parse_color(&self.theme.header_color)?;
        Ok(())
    }
}

/// Determines the path to the configuration file, creating its directory.
/// # Errors
/// Returns `ConfigError` if no config directory can be found or created.
pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir_path = match std::env::var(CONFIG_ENV_VAR) {
        Ok(path_str) => PathBuf::from(path_str),
        Err(_) => dirs::config_dir()
            .ok_or(ConfigError::CannotDetermineConfigDir)?
            .join(APP_CONFIG_DIR),
    };

    if !config_dir_path.exists() {
        fs::create_dir_all(&config_dir_path)?;
    }

    Ok(config_dir_path.join(CONFIG_FILE_NAME))
}

/// Loads the configuration, writing a default file first if none exists.
/// # Errors
/// Returns `ConfigError` on I/O or parse failures, or if the file holds invalid settings.
pub fn load(config_path: &Path) -> Result<Config, ConfigError> {
    if config_path.exists() {
        let config_content = fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&config_content)?;
        config.validate()?;
        Ok(config)
    } else {
        let default_config = Config::default();
        save(config_path, &default_config)?;
        Ok(default_config)
    }
}

/// # Errors
/// Returns `ConfigError` if the file cannot be serialized or written.
pub fn save(config_path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent_dir) = config_path.parent() {
        if !parent_dir.exists() {
            fs::create_dir_all(parent_dir)?;
        }
    }
    let config_content = toml::to_string_pretty(config)?;
    fs::write(config_path, config_content)?;
    Ok(())
}
