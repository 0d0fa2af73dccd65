use std::env;
use std::path::PathBuf;

pub const TOKEN_ENV: &str = "TELOXIDE_TOKEN";
pub const SCHEDULE_FILE_ENV: &str = "SCHEDULE_FILE";
pub const DEFAULT_SCHEDULE_FILE: &str = "schedules.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set to the Telegram bot token")]
    MissingToken(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub schedule_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = lookup(TOKEN_ENV)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken(TOKEN_ENV))?;

        let schedule_file = lookup(SCHEDULE_FILE_ENV)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEDULE_FILE));

        Ok(Config { token, schedule_file })
    }
}
