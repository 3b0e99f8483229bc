//! # Service Configuration
//!
//! Environment-driven settings for the `meeple-api` binary. `main` loads an
//! optional `.env` file first (dotenvy), so every variable below can live
//! there during development.
//!
//! | Variable                | Default | Meaning                                   |
//! |-------------------------|---------|-------------------------------------------|
//! | `PORT`                  | 5000    | HTTP port                                 |
//! | `DATABASE_URL`          | unset   | SQLite URL; unset means in-memory store   |
//! | `MEEPLE_ROUND_DAYS`     | 7       | Length of newly opened rounds             |
//! | `MEEPLE_ROSTER`         | unset   | YAML roster file                          |
//! | `MEEPLE_ENFORCE_ROSTER` | false   | Reject proposers/voters not on the roster |
//! | `MEEPLE_ADMIN_TOKEN`    | unset   | Bearer token guarding round closing       |
//! | `MEEPLE_RELAY_URL`      | unset   | Outbound messaging relay endpoint         |
//! | `MEEPLE_LOG_FORMAT`     | text    | `json` for JSON log lines                 |

use std::path::PathBuf;

use meeple_core::{Roster, RosterError};
use meeple_state::{RoundSchedule, DEFAULT_ROUND_DAYS};
use thiserror::Error;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 5000;

/// Invalid configuration value.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
    #[error(transparent)]
    Roster(#[from] RosterError),
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Application configuration.
///
/// Custom `Debug` redacts the admin token.
#[derive(Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub round_days: u32,
    pub roster_path: Option<PathBuf>,
    pub enforce_roster: bool,
    pub admin_token: Option<String>,
    pub relay_url: Option<String>,
    pub log_format: LogFormat,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("database_url", &self.database_url)
            .field("round_days", &self.round_days)
            .field("roster_path", &self.roster_path)
            .field("enforce_roster", &self.enforce_roster)
            .field("admin_token", &self.admin_token.as_ref().map(|_| "[REDACTED]"))
            .field("relay_url", &self.relay_url)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
            round_days: DEFAULT_ROUND_DAYS,
            roster_path: None,
            enforce_roster: false,
            admin_token: None,
            relay_url: None,
            log_format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
                ConfigError::Invalid {
                    var: "PORT",
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?,
            None => defaults.port,
        };

        let round_days = match get("MEEPLE_ROUND_DAYS") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(days) if days > 0 => days,
                Ok(_) => {
                    return Err(ConfigError::Invalid {
                        var: "MEEPLE_ROUND_DAYS",
                        value: raw,
                        reason: "must be at least 1".to_string(),
                    })
                }
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        var: "MEEPLE_ROUND_DAYS",
                        value: raw,
                        reason: e.to_string(),
                    })
                }
            },
            None => defaults.round_days,
        };

        let enforce_roster = match get("MEEPLE_ENFORCE_ROSTER") {
            Some(raw) => parse_flag("MEEPLE_ENFORCE_ROSTER", &raw)?,
            None => defaults.enforce_roster,
        };

        let log_format = match get("MEEPLE_LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "MEEPLE_LOG_FORMAT",
                    value: other.to_string(),
                    reason: "expected 'text' or 'json'".to_string(),
                })
            }
        };

        Ok(Self {
            port,
            database_url: get("DATABASE_URL"),
            round_days,
            roster_path: get("MEEPLE_ROSTER").map(PathBuf::from),
            enforce_roster,
            admin_token: get("MEEPLE_ADMIN_TOKEN"),
            relay_url: get("MEEPLE_RELAY_URL"),
            log_format,
        })
    }

    /// The roster file if configured, otherwise the built-in group.
    pub fn load_roster(&self) -> Result<Roster, ConfigError> {
        match &self.roster_path {
            Some(path) => Ok(Roster::load(path)?),
            None => Ok(Roster::default_group()),
        }
    }

    /// Round timing derived from `round_days`.
    pub fn schedule(&self) -> RoundSchedule {
        RoundSchedule::from_days(self.round_days).unwrap_or_default()
    }
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: raw.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.round_days, 7);
        assert!(cfg.database_url.is_none());
        assert!(!cfg.enforce_roster);
        assert_eq!(cfg.log_format, LogFormat::Text);
    }

    #[test]
    fn values_are_read_from_environment() {
        let cfg = config(&[
            ("PORT", "8081"),
            ("DATABASE_URL", "sqlite://meeple.db"),
            ("MEEPLE_ROUND_DAYS", "14"),
            ("MEEPLE_ENFORCE_ROSTER", "yes"),
            ("MEEPLE_ADMIN_TOKEN", "s3cret"),
            ("MEEPLE_LOG_FORMAT", "json"),
        ])
        .unwrap();
        assert_eq!(cfg.port, 8081);
        assert_eq!(cfg.database_url.as_deref(), Some("sqlite://meeple.db"));
        assert_eq!(cfg.round_days, 14);
        assert!(cfg.enforce_roster);
        assert_eq!(cfg.admin_token.as_deref(), Some("s3cret"));
        assert_eq!(cfg.log_format, LogFormat::Json);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let cfg = config(&[("DATABASE_URL", "  "), ("PORT", "")]).unwrap();
        assert!(cfg.database_url.is_none());
        assert_eq!(cfg.port, 5000);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(config(&[("PORT", "http")]).is_err());
        assert!(config(&[("MEEPLE_ROUND_DAYS", "0")]).is_err());
        assert!(config(&[("MEEPLE_ENFORCE_ROSTER", "maybe")]).is_err());
        assert!(config(&[("MEEPLE_LOG_FORMAT", "xml")]).is_err());
    }

    #[test]
    fn debug_redacts_admin_token() {
        let cfg = config(&[("MEEPLE_ADMIN_TOKEN", "s3cret")]).unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
