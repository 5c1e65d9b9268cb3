use std::collections::{HashMap, HashSet};

use tracing::info;

use common::{Config, Error, Result};

use crate::config::{StrategyConfig, StrategyFileConfig};
use crate::sink::{sink_for, LogSink};
use crate::{Strategy, StrategyAdapter};

/// Adapter over a configured strategy, as built by the registry.
pub type DynAdapter = StrategyAdapter<Box<dyn Strategy>, Box<dyn LogSink>>;

/// Builds one strategy instance from its `[[strategy]]` entry.
pub type StrategyBuilder = Box<dyn Fn(&StrategyConfig) -> Result<Box<dyn Strategy>> + Send + Sync>;

/// Maps the `type` field of a strategy entry to the code that builds it.
///
/// The crate ships no decision logic of its own; the host registers its
/// strategy types here before loading the strategy file.
#[derive(Default)]
pub struct StrategyFactory {
    builders: HashMap<String, StrategyBuilder>,
}

impl StrategyFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `builder` under `kind`, replacing any previous builder.
    pub fn register<F>(&mut self, kind: impl Into<String>, builder: F) -> &mut Self
    where
        F: Fn(&StrategyConfig) -> Result<Box<dyn Strategy>> + Send + Sync + 'static,
    {
        self.builders.insert(kind.into(), Box::new(builder));
        self
    }

    pub fn build(&self, cfg: &StrategyConfig) -> Result<Box<dyn Strategy>> {
        let builder = self.builders.get(&cfg.strategy_type).ok_or_else(|| {
            Error::Config(format!(
                "strategy '{}': unknown type '{}'",
                cfg.name, cfg.strategy_type
            ))
        })?;
        builder(cfg)
    }
}

/// Holds one adapter per configured strategy, in file order.
pub struct StrategyRegistry {
    adapters: Vec<DynAdapter>,
}

impl StrategyRegistry {
    /// Load the strategy file named by `cfg` and build every entry.
    pub fn load(cfg: &Config, factory: &StrategyFactory) -> Result<Self> {
        let file = StrategyFileConfig::load(&cfg.strategy_config_path)?;
        Self::from_config(&file, cfg, factory)
    }

    /// Build the registry, failing on unknown types, builder errors or
    /// duplicate names.
    pub fn from_config(
        file_cfg: &StrategyFileConfig,
        cfg: &Config,
        factory: &StrategyFactory,
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut adapters = Vec::with_capacity(file_cfg.strategies.len());

        for entry in &file_cfg.strategies {
            if !seen.insert(entry.name.as_str()) {
                return Err(Error::Config(format!(
                    "duplicate strategy name '{}'",
                    entry.name
                )));
            }
            let strategy = factory.build(entry)?;
            let debug_enabled = entry.debug.unwrap_or(cfg.debug);
            info!(
                name = %strategy.name(),
                kind = %entry.strategy_type,
                debug_enabled,
                "Registered strategy"
            );
            adapters.push(StrategyAdapter::with_sink(
                strategy,
                debug_enabled,
                sink_for(cfg.log_target),
            ));
        }

        Ok(Self { adapters })
    }

    pub fn get(&self, name: &str) -> Option<&DynAdapter> {
        self.adapters.iter().find(|a| a.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DynAdapter> {
        self.adapters.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut DynAdapter> {
        self.adapters.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
