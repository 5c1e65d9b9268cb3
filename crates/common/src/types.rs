use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Trading decision produced by a strategy for one bar.
///
/// The absence of a decision ("unset") is modelled as `Option<Signal>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Long,
    Neutral,
    Short,
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signal::Long => write!(f, "long"),
            Signal::Neutral => write!(f, "neutral"),
            Signal::Short => write!(f, "short"),
        }
    }
}

/// Side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "BUY"),
            OrderSide::Sell => write!(f, "SELL"),
        }
    }
}

/// Engine-assigned order reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    /// Fresh random id, for engines that do not number their own orders.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl From<&str> for OrderId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Execution details reported by the engine once an order completes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    pub price: f64,
    /// Executed value (cost) of the fill.
    pub value: f64,
    pub commission: f64,
}

/// Status transitions delivered by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OrderStatus {
    Submitted,
    Accepted,
    Completed(Execution),
    Canceled,
    Margin,
    Rejected,
}

impl OrderStatus {
    /// `Submitted` and `Accepted` are informational; every other status ends
    /// the order's life.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Submitted | OrderStatus::Accepted)
    }
}

/// An order as seen in a status notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub side: OrderSide,
    pub status: OrderStatus,
}

impl Order {
    pub fn new(id: impl Into<OrderId>, side: OrderSide, status: OrderStatus) -> Self {
        Self {
            id: id.into(),
            side,
            status,
        }
    }

    /// Completed order with the given execution.
    pub fn filled(id: impl Into<OrderId>, side: OrderSide, execution: Execution) -> Self {
        Self::new(id, side, OrderStatus::Completed(execution))
    }
}

/// One bar of market data as delivered by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Bar with every price field set to `price` and zero volume.
    pub fn flat(timestamp: NaiveDateTime, price: f64) -> Self {
        Self {
            timestamp,
            open: price,
            high: price,
            low: price,
            close: price,
            volume: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    Long,
    Short,
}

/// The engine's authoritative view of the open position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub side: PositionSide,
    pub size: f64,
}

/// Everything the engine exposes to a strategy for the current callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketContext {
    /// Number of bars processed so far, including the current one.
    pub bar_index: usize,
    pub bar: Bar,
    pub position: Option<Position>,
}

impl MarketContext {
    pub fn new(bar_index: usize, bar: Bar) -> Self {
        Self {
            bar_index,
            bar,
            position: None,
        }
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn date(&self) -> NaiveDate {
        self.bar.timestamp.date()
    }

    pub fn time(&self) -> NaiveTime {
        self.bar.timestamp.time()
    }

    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn has_position(&self) -> bool {
        self.position.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_submitted_and_accepted_are_non_terminal() {
        let exec = Execution { price: 1.0, value: 1.0, commission: 0.0 };
        assert!(!OrderStatus::Submitted.is_terminal());
        assert!(!OrderStatus::Accepted.is_terminal());
        assert!(OrderStatus::Completed(exec).is_terminal());
        assert!(OrderStatus::Canceled.is_terminal());
        assert!(OrderStatus::Margin.is_terminal());
        assert!(OrderStatus::Rejected.is_terminal());
    }

    #[test]
    fn context_splits_bar_timestamp() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let ctx = MarketContext::new(7, Bar::flat(ts, 10.0));
        assert_eq!(ctx.date().to_string(), "2024-03-01");
        assert_eq!(ctx.time().to_string(), "09:30:00");
        assert!(!ctx.has_position());

        let ctx = ctx.with_position(Position { side: PositionSide::Short, size: 1.0 });
        assert_eq!(ctx.position().map(|p| p.side), Some(PositionSide::Short));
    }

    #[test]
    fn order_status_serializes_with_tag() {
        let order = Order::filled(
            "o-1",
            OrderSide::Buy,
            Execution { price: 101.5, value: 101.5, commission: 0.1 },
        );
        let json = serde_json::to_string(&order).unwrap();
        assert!(json.contains(r#""status":"completed""#), "{json}");
        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(back, order);
    }
}
