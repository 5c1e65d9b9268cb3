pub mod adapter;
pub mod config;
pub mod registry;
pub mod sink;

pub use adapter::{FillEffect, StrategyAdapter, StrategyState};
pub use config::{StrategyConfig, StrategyFileConfig};
pub use registry::{StrategyBuilder, StrategyFactory, StrategyRegistry};
pub use sink::{LogSink, StdoutSink, TracingSink};

use common::{Error, MarketContext, Result, Signal};

/// Decision logic plugged into a [`StrategyAdapter`].
///
/// Implementors must override [`execute`](Strategy::execute); the provided
/// body fails with [`Error::NotImplemented`], which aborts the run.
pub trait Strategy: Send {
    /// Human-readable name of this strategy instance.
    fn name(&self) -> &str;

    /// Produce this bar's decision. `Ok(None)` means "no decision this bar".
    fn execute(&mut self, _ctx: &MarketContext) -> Result<Option<Signal>> {
        Err(Error::NotImplemented("Strategy::execute"))
    }
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn execute(&mut self, ctx: &MarketContext) -> Result<Option<Signal>> {
        (**self).execute(ctx)
    }
}

/// The bare base strategy: has no decision logic of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseStrategy;

impl Strategy for BaseStrategy {
    fn name(&self) -> &str {
        "base"
    }
}
