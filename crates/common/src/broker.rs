use crate::{OrderId, Result};

/// Commands a strategy can send back to the engine.
///
/// The engine binding implements this; each call submits one order and
/// returns the id the engine will use in later status notifications.
/// Calls are synchronous because the engine drives strategies serially.
pub trait Broker {
    /// Request a long entry.
    fn buy(&mut self) -> Result<OrderId>;

    /// Request a short entry.
    fn sell(&mut self) -> Result<OrderId>;

    /// Request that the currently open position be closed.
    fn close(&mut self) -> Result<OrderId>;
}
