use std::env;
use std::str::FromStr;

use dotenv::dotenv;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Level;

const LOG_LEVEL: &str = "EXCHANGE_LOG_LEVEL";
const OUTPUT: &str = "EXCHANGE_OUTPUT";
const ECHO_BOOK: &str = "EXCHANGE_ECHO_BOOK";

/// How responses are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::InvalidValue {
                key: OUTPUT,
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for environment variable {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub log_level: Level,
    pub output: OutputFormat,
    /// Print the whole book after every command.
    pub echo_book: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: Level::INFO,
            output: OutputFormat::Text,
            echo_book: false,
        }
    }
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn try_from_env() -> Result<Config, ConfigError> {
        dotenv().ok();
        Self::try_from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset keys fall back to defaults.
    pub fn try_from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let log_level = match lookup(LOG_LEVEL) {
            Some(raw) => raw.trim().parse::<Level>().map_err(|_| ConfigError::InvalidValue {
                key: LOG_LEVEL,
                value: raw.clone(),
            })?,
            None => defaults.log_level,
        };

        let output = match lookup(OUTPUT) {
            Some(raw) => raw.parse()?,
            None => defaults.output,
        };

        let echo_book = match lookup(ECHO_BOOK) {
            Some(raw) => parse_flag(ECHO_BOOK, &raw)?,
            None => defaults.echo_book,
        };

        Ok(Config {
            log_level,
            output,
            echo_book,
        })
    }
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::try_from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_reads_every_key() {
        let config = Config::try_from_lookup(lookup_from(&[
            (LOG_LEVEL, "debug"),
            (OUTPUT, "JSON"),
            (ECHO_BOOK, "yes"),
        ]))
        .unwrap();

        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.output, OutputFormat::Json);
        assert!(config.echo_book);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert_eq!(
            Config::try_from_lookup(lookup_from(&[(OUTPUT, "xml")])),
            Err(ConfigError::InvalidValue { key: OUTPUT, value: "xml".to_string() })
        );
        assert_eq!(
            Config::try_from_lookup(lookup_from(&[(ECHO_BOOK, "maybe")])),
            Err(ConfigError::InvalidValue { key: ECHO_BOOK, value: "maybe".to_string() })
        );
        assert!(Config::try_from_lookup(lookup_from(&[(LOG_LEVEL, "loud")])).is_err());
    }
}
