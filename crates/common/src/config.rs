use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// Where strategy lifecycle lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    /// One `tracing` event per line; the host decides where it ends up.
    #[default]
    Tracing,
    /// Plain lines on standard output.
    Stdout,
}

impl std::str::FromStr for LogTarget {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "tracing" => Ok(LogTarget::Tracing),
            "stdout" => Ok(LogTarget::Stdout),
            other => Err(Error::Config(format!(
                "STRATEGY_LOG_TARGET must be 'tracing' or 'stdout', got: '{other}'"
            ))),
        }
    }
}

/// Process-level settings loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Default for strategies that do not set `debug` themselves.
    pub debug: bool,
    pub log_target: LogTarget,
    /// Strategy config file path
    pub strategy_config_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: true,
            log_target: LogTarget::default(),
            strategy_config_path: "config/strategies.toml".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // ignore error if .env not present
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let debug_enabled = match lookup("STRATEGY_DEBUG") {
            Some(raw) => parse_bool("STRATEGY_DEBUG", &raw)?,
            None => defaults.debug,
        };

        let log_target = match lookup("STRATEGY_LOG_TARGET") {
            Some(raw) => raw.parse()?,
            None => defaults.log_target,
        };

        let strategy_config_path = lookup("STRATEGY_CONFIG_PATH")
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(defaults.strategy_config_path);

        let cfg = Config {
            debug: debug_enabled,
            log_target,
            strategy_config_path,
        };
        debug!(?cfg, "Configuration loaded");
        Ok(cfg)
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::Config(format!(
            "{key} must be a boolean, got: '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let cfg = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(cfg.debug);
        assert_eq!(cfg.log_target, LogTarget::Tracing);
    }

    #[test]
    fn reads_every_variable() {
        let cfg = Config::from_lookup(lookup_from(&[
            ("STRATEGY_DEBUG", "off"),
            ("STRATEGY_LOG_TARGET", "Stdout"),
            ("STRATEGY_CONFIG_PATH", "/tmp/s.toml"),
        ]))
        .unwrap();
        assert!(!cfg.debug);
        assert_eq!(cfg.log_target, LogTarget::Stdout);
        assert_eq!(cfg.strategy_config_path, "/tmp/s.toml");
    }

    #[test]
    fn rejects_bad_boolean() {
        let err = Config::from_lookup(lookup_from(&[("STRATEGY_DEBUG", "maybe")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "{err}");
    }

    #[test]
    fn rejects_unknown_log_target() {
        let err =
            Config::from_lookup(lookup_from(&[("STRATEGY_LOG_TARGET", "syslog")])).unwrap_err();
        assert!(err.to_string().contains("syslog"));
    }
}
