//! Terminal configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tictactoe_engine::{DEFAULT_COMPUTER_DELAY, GameMode};
use tracing::{debug, info, instrument};

/// Config file read when none is given explicitly.
pub const DEFAULT_CONFIG_PATH: &str = "tictactoe.toml";

/// Settings for the terminal front end.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct TerminalConfig {
    /// Mode of the first game.
    #[serde(default)]
    mode: GameMode,

    /// Delay before the computer's move is applied, in milliseconds.
    #[serde(default = "default_computer_delay_ms")]
    computer_delay_ms: u64,

    /// File receiving logs while the terminal UI owns the screen.
    #[serde(default = "default_log_file")]
    log_file: PathBuf,
}

fn default_computer_delay_ms() -> u64 {
    u64::try_from(DEFAULT_COMPUTER_DELAY.as_millis()).unwrap_or(u64::MAX)
}

fn default_log_file() -> PathBuf {
    PathBuf::from("tictactoe.log")
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::default(),
            computer_delay_ms: default_computer_delay_ms(),
            log_file: default_log_file(),
        }
    }
}

impl TerminalConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(mode = %config.mode, delay_ms = config.computer_delay_ms, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if given, otherwise [`DEFAULT_CONFIG_PATH`] if it exists,
    /// otherwise the defaults.
    ///
    /// An explicitly given path must exist.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(DEFAULT_CONFIG_PATH),
            None => {
                debug!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Overrides the starting mode.
    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.mode = mode;
        self
    }

    /// Overrides the computer delay.
    pub fn with_computer_delay_ms(mut self, delay_ms: u64) -> Self {
        self.computer_delay_ms = delay_ms;
        self
    }

    /// The computer delay as a [`Duration`].
    pub fn computer_delay(&self) -> Duration {
        Duration::from_millis(self.computer_delay_ms)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
