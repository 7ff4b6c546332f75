use crate::errors::{DuetError, DuetResult};
use serde::{Deserialize, Serialize};
use shell_words::split as shell_split;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub const BACKEND_ENV: &str = "DUET_BACKEND";
pub const LOG_LEVEL_ENV: &str = "DUET_LOG_LEVEL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Program and arguments of the backend process. `None` runs the
    /// in-process loopback backend.
    pub backend_command: Option<Vec<String>>,
    pub request_initial_data: bool,
    /// Sources rendered as the system speaker. Everything else is a user.
    pub system_sources: Vec<String>,
    pub bubble_width_percent: u16,
    pub escape_control: bool,
    pub ignore_blank_input: bool,
    pub tick_rate_ms: u64,
    pub log_level: String,
    pub title: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_command: None,
            request_initial_data: true,
            system_sources: vec!["llm".to_string()],
            bubble_width_percent: 50,
            escape_control: true,
            ignore_blank_input: false,
            tick_rate_ms: 250,
            log_level: "info".to_string(),
            title: "duet".to_string(),
        }
    }
}

impl Config {
    /// Loads the config at `path`, writing the defaults there first if the
    /// file does not exist yet. Environment overrides are applied afterwards.
    pub fn load_or_create(path: &Path) -> DuetResult<Config> {
        let mut config = if path.exists() {
            let config_str = fs::read_to_string(path).map_err(|e| {
                DuetError::config_error(format!("Failed to read config file: {}", e))
            })?;

            serde_json::from_str::<Config>(&config_str)
                .map_err(|e| DuetError::config_error(format!("Failed to parse config: {}", e)))?
        } else {
            let config = Config::default();
            config.save(path)?;
            config
        };

        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> DuetResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                DuetError::config_error(format!("Failed to create config directory: {}", e))
            })?;
        }

        let config_str = serde_json::to_string_pretty(self)
            .map_err(|e| DuetError::config_error(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, config_str)
            .map_err(|e| DuetError::config_error(format!("Failed to write config file: {}", e)))
    }

    fn apply_env(&mut self) -> DuetResult<()> {
        if let Ok(command) = env::var(BACKEND_ENV) {
            self.backend_command = parse_command_line(&command)?;
        }
        if let Ok(level) = env::var(LOG_LEVEL_ENV) {
            if !level.trim().is_empty() {
                self.log_level = level;
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> DuetResult<()> {
        if !(10..=100).contains(&self.bubble_width_percent) {
            return Err(DuetError::config_error(
                "bubble_width_percent must be between 10 and 100",
            ));
        }

        if self.tick_rate_ms == 0 {
            return Err(DuetError::config_error(
                "tick_rate_ms must be greater than 0",
            ));
        }

        if let Some(command) = &self.backend_command {
            if command.first().map_or(true, |program| program.is_empty()) {
                return Err(DuetError::config_error(
                    "backend_command must name a program",
                ));
            }
        }

        Ok(())
    }
}

pub fn default_config_path() -> DuetResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| DuetError::config_error("Could not determine config directory"))?;

    Ok(config_dir.join("duet").join("config.json"))
}

/// Splits a command line with shell quoting rules. Empty input means "no
/// backend"; unbalanced quotes are an error.
pub fn parse_command_line(command: &str) -> DuetResult<Option<Vec<String>>> {
    let parts = shell_split(command).map_err(|e| {
        DuetError::config_error(format!("Invalid backend command {:?}: {}", command, e))
    })?;
    Ok(if parts.is_empty() { None } else { Some(parts) })
}
