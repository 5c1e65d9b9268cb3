use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::Serialize;
use tracing::{debug, warn};

use common::{Broker, MarketContext, Order, OrderId, OrderSide, OrderStatus, Result, Signal};

use crate::sink::{LogSink, TracingSink};
use crate::Strategy;

/// Bookkeeping owned by one adapter for the length of a run.
///
/// The leg counters are the adapter's own belief about open positions. They
/// are not reconciled against the engine; `MarketContext::position` is what
/// decides whether a position exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyState {
    pub open_buy_legs: u32,
    pub open_sell_legs: u32,
    /// `None` until the strategy has produced a decision.
    pub last_signal: Option<Signal>,
    pub buys_issued: u64,
    pub sells_issued: u64,
    pub debug_enabled: bool,
    pub pending_order: Option<OrderId>,
    /// Bar index of the most recent completed fill.
    pub bar_executed: Option<usize>,
}

impl StrategyState {
    pub fn new(debug_enabled: bool) -> Self {
        Self {
            open_buy_legs: 0,
            open_sell_legs: 0,
            last_signal: None,
            buys_issued: 0,
            sells_issued: 0,
            debug_enabled,
            pending_order: None,
            bar_executed: None,
        }
    }

    /// Account for a completed order. A fill against an opposite leg closes
    /// it; otherwise it opens a new leg on its own side.
    pub fn apply_fill(&mut self, side: OrderSide) -> FillEffect {
        match side {
            OrderSide::Buy if self.open_sell_legs > 0 => {
                self.open_sell_legs -= 1;
                FillEffect::CloseShort
            }
            OrderSide::Buy => {
                self.open_buy_legs += 1;
                FillEffect::OpenLong
            }
            OrderSide::Sell if self.open_buy_legs > 0 => {
                self.open_buy_legs -= 1;
                FillEffect::CloseLong
            }
            OrderSide::Sell => {
                self.open_sell_legs += 1;
                FillEffect::OpenShort
            }
        }
    }
}

impl Default for StrategyState {
    fn default() -> Self {
        Self::new(true)
    }
}

/// How a completed order changed the leg counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillEffect {
    OpenLong,
    CloseShort,
    OpenShort,
    CloseLong,
}

impl FillEffect {
    pub fn label(&self) -> &'static str {
        match self {
            FillEffect::OpenLong => "BUY EXECUTED",
            FillEffect::CloseShort => "CLOSE SELL",
            FillEffect::OpenShort => "SELL EXECUTED",
            FillEffect::CloseLong => "CLOSE BUY",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Buy,
    Sell,
    Close,
}

/// Binds a [`Strategy`] to the engine's callbacks.
///
/// The engine calls [`on_bar`](Self::on_bar) once per bar and
/// [`on_order_status_changed`](Self::on_order_status_changed) once per order
/// status transition, never concurrently. The adapter turns the strategy's
/// signal into at most one `buy`, `sell` or `close` per bar and keeps the
/// leg counters in step with fills.
pub struct StrategyAdapter<S, L = TracingSink> {
    strategy: S,
    state: StrategyState,
    sink: L,
}

impl<S: Strategy> StrategyAdapter<S> {
    pub fn new(strategy: S, debug_enabled: bool) -> Self {
        Self::with_sink(strategy, debug_enabled, TracingSink)
    }
}

impl<S: Strategy, L: LogSink> StrategyAdapter<S, L> {
    pub fn with_sink(strategy: S, debug_enabled: bool, sink: L) -> Self {
        Self {
            strategy,
            state: StrategyState::new(debug_enabled),
            sink,
        }
    }

    pub fn name(&self) -> &str {
        self.strategy.name()
    }

    pub fn state(&self) -> &StrategyState {
        &self.state
    }

    pub fn sink(&self) -> &L {
        &self.sink
    }

    /// Write one lifecycle line stamped with the current bar's date.
    ///
    /// The time of day comes from `time` when given, else from the bar.
    /// Does nothing when debug logging is off.
    pub fn log_event(&mut self, ctx: &MarketContext, message: &str, time: Option<NaiveTime>) {
        if !self.state.debug_enabled {
            return;
        }
        let line = format_event(ctx.date(), time.unwrap_or_else(|| ctx.time()), message);
        self.sink.emit(&line);
    }

    /// Order status callback. Never submits orders.
    pub fn on_order_status_changed(&mut self, ctx: &MarketContext, order: &Order) {
        match order.status {
            OrderStatus::Submitted | OrderStatus::Accepted => {}
            OrderStatus::Completed(execution) => {
                let effect = self.state.apply_fill(order.side);
                debug!(
                    strategy = %self.strategy.name(),
                    order_id = %order.id,
                    side = %order.side,
                    ?effect,
                    open_buy_legs = self.state.open_buy_legs,
                    open_sell_legs = self.state.open_sell_legs,
                    "Fill applied"
                );
                let message = format!(
                    "{}, Price: {:.2}, Cost: {:.2}, Comm {:.2}",
                    effect.label(),
                    execution.price,
                    execution.value,
                    execution.commission
                );
                self.log_event(ctx, &message, None);
                self.state.bar_executed = Some(ctx.bar_index);
            }
            OrderStatus::Canceled | OrderStatus::Margin | OrderStatus::Rejected => {
                debug!(
                    strategy = %self.strategy.name(),
                    order_id = %order.id,
                    status = ?order.status,
                    "Order ended without fill"
                );
                self.log_event(ctx, "Order Canceled/Margin/Rejected", None);
            }
        }
        if order.status.is_terminal() {
            self.state.pending_order = None;
        }
    }

    /// Per-bar callback: ask the strategy for a signal and act on it.
    ///
    /// A strategy error aborts the bar before any state changes. A broker
    /// error leaves the counters and the pending order untouched.
    pub fn on_bar<B: Broker + ?Sized>(
        &mut self,
        ctx: &MarketContext,
        broker: &mut B,
    ) -> Result<()> {
        let signal = self.strategy.execute(ctx)?;
        self.state.last_signal = signal;

        let Some(signal) = signal else {
            return Ok(());
        };

        let positioned = ctx.has_position();
        let command = match signal {
            Signal::Long if positioned => (self.state.open_sell_legs > 0).then_some(Command::Close),
            Signal::Long => Some(Command::Buy),
            Signal::Short if positioned => (self.state.open_buy_legs > 0).then_some(Command::Close),
            Signal::Short => Some(Command::Sell),
            Signal::Neutral => None,
        };
        let Some(command) = command else {
            return Ok(());
        };

        let submitted = match command {
            Command::Buy => broker.buy(),
            Command::Sell => broker.sell(),
            Command::Close => broker.close(),
        };
        let order_id = submitted.map_err(|e| {
            warn!(
                strategy = %self.strategy.name(),
                bar = ctx.bar_index,
                ?command,
                error = %e,
                "Broker refused command"
            );
            e
        })?;

        match command {
            Command::Buy => self.state.buys_issued += 1,
            Command::Sell => self.state.sells_issued += 1,
            Command::Close => {}
        }
        debug!(
            strategy = %self.strategy.name(),
            bar = ctx.bar_index,
            %signal,
            ?command,
            order_id = %order_id,
            "Command issued"
        );
        self.state.pending_order = Some(order_id);
        Ok(())
    }
}

/// `"<date>T<time>, <message>"`, with the time in ISO form.
fn format_event(date: NaiveDate, time: NaiveTime, message: &str) -> String {
    format!("{date}T{}, {message}", iso_time(time))
}

/// `HH:MM:SS`, plus `.ffffff` only when the microsecond part is non-zero.
fn iso_time(time: NaiveTime) -> String {
    if time.nanosecond() / 1_000 == 0 {
        time.format("%H:%M:%S").to_string()
    } else {
        time.format("%H:%M:%S%.6f").to_string()
    }
}
