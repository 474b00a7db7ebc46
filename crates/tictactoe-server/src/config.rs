//! Environment-driven server configuration.

use std::net::{AddrParseError, SocketAddr};
use std::num::ParseIntError;
use std::time::Duration;
use thiserror::Error;
use tictactoe_core::{Difficulty, ParseDifficultyError};

const DEFAULT_PORT: u16 = 8080;

/// Pause before the opponent answers, so the human's mark renders first
const DEFAULT_BOT_DELAY_MS: u64 = 500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid SERVER_ADDR '{value}': {source}")]
    InvalidAddr {
        value: String,
        source: AddrParseError,
    },

    #[error("Invalid BOT_DELAY_MS '{value}': {source}")]
    InvalidDelay {
        value: String,
        source: ParseIntError,
    },

    #[error("Invalid DEFAULT_DIFFICULTY: {0}")]
    InvalidDifficulty(#[from] ParseDifficultyError),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub bot_delay: Duration,
    /// Difficulty for every new connection
    pub default_difficulty: Difficulty,
}

impl ServerConfig {
    /// Read `SERVER_ADDR`, `BOT_DELAY_MS` and `DEFAULT_DIFFICULTY`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let addr = match lookup("SERVER_ADDR") {
            Some(value) => value
                .trim()
                .parse::<SocketAddr>()
                .map_err(|source| ConfigError::InvalidAddr {
                    value: value.clone(),
                    source,
                })?,
            None => defaults.addr,
        };

        let bot_delay = match lookup("BOT_DELAY_MS") {
            Some(value) => {
                let ms = value
                    .trim()
                    .parse::<u64>()
                    .map_err(|source| ConfigError::InvalidDelay {
                        value: value.clone(),
                        source,
                    })?;
                Duration::from_millis(ms)
            }
            None => defaults.bot_delay,
        };

        let default_difficulty = match lookup("DEFAULT_DIFFICULTY") {
            Some(value) => value.parse::<Difficulty>()?,
            None => defaults.default_difficulty,
        };

        Ok(Self {
            addr,
            bot_delay,
            default_difficulty,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            bot_delay: Duration::from_millis(DEFAULT_BOT_DELAY_MS),
            default_difficulty: Difficulty::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.bot_delay, Duration::from_millis(500));
        assert_eq!(config.default_difficulty, Difficulty::Easy);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("SERVER_ADDR", "127.0.0.1:9000"),
            ("BOT_DELAY_MS", "0"),
            ("DEFAULT_DIFFICULTY", "HARD"),
        ]))
        .unwrap();
        assert_eq!(config.addr.port(), 9000);
        assert_eq!(config.bot_delay, Duration::ZERO);
        assert_eq!(config.default_difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("SERVER_ADDR", "nowhere")])),
            Err(ConfigError::InvalidAddr { .. })
        ));
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("BOT_DELAY_MS", "-5")])),
            Err(ConfigError::InvalidDelay { .. })
        ));
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("DEFAULT_DIFFICULTY", "expert")])),
            Err(ConfigError::InvalidDifficulty(_))
        ));
    }
}
