use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use common::{Error, Result};

/// Top-level strategy config file (TOML).
///
/// Example `config/strategies.toml`:
/// ```toml
/// [[strategy]]
/// type = "breakout"
/// name = "breakout-20"
/// debug = false
///
/// [strategy.params]
/// lookback = 20
/// threshold = 1.5
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StrategyFileConfig {
    #[serde(rename = "strategy", default)]
    pub strategies: Vec<StrategyConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StrategyConfig {
    /// Key under which the builder was registered in a `StrategyFactory`.
    #[serde(rename = "type")]
    pub strategy_type: String,
    /// Name used in logs; must be unique within a file.
    pub name: String,
    /// Lifecycle logging; falls back to the process-wide default when unset.
    #[serde(default)]
    pub debug: Option<bool>,
    /// Free-form parameters, interpreted by the strategy's builder.
    #[serde(default)]
    pub params: HashMap<String, toml::Value>,
}

impl StrategyFileConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read strategy config at '{}': {e}",
                path.display()
            ))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

impl StrategyConfig {
    pub fn param_f64(&self, key: &str, default: f64) -> Result<f64> {
        match self.params.get(key) {
            None => Ok(default),
            Some(toml::Value::Float(v)) => Ok(*v),
            Some(toml::Value::Integer(v)) => Ok(*v as f64),
            Some(other) => Err(self.bad_param(key, other)),
        }
    }

    pub fn param_usize(&self, key: &str, default: usize) -> Result<usize> {
        match self.params.get(key) {
            None => Ok(default),
            Some(toml::Value::Integer(v)) if *v >= 0 => Ok(*v as usize),
            Some(other) => Err(self.bad_param(key, other)),
        }
    }

    fn bad_param(&self, key: &str, value: &toml::Value) -> Error {
        Error::Config(format!(
            "strategy '{}': invalid value for '{key}': {value}",
            self.name
        ))
    }
}
