//! Order intent types.

use crate::ids::{OrderId, Symbol, TraderId};
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side (buyer or seller).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Get the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Order execution type.
///
/// Stop and StopLimit orders wait in the stop registry; when a trade price
/// reaches their stop price they convert to Market and Limit respectively
/// and enter matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderKind {
    /// Execute at the limit price or better, rest the remainder.
    Limit,
    /// Execute against whatever liquidity is present, discard the remainder.
    Market,
    /// Dormant until the stop price trades, then becomes Market.
    Stop,
    /// Dormant until the stop price trades, then becomes Limit.
    StopLimit,
}

/// Time-in-force policy.
///
/// Carried on the order and surfaced to the embedder; matching currently
/// treats every order as GoodTillCancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeInForce {
    GoodTillCancel,
    ImmediateOrCancel,
    FillOrKill,
}

/// A unit of trading intent.
///
/// `quantity` is the remaining open quantity; it counts down as the order
/// fills. `timestamp` is stamped by the book on acceptance and is audit
/// metadata only: time priority within a price level comes from insertion
/// order, never from comparing timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub trader_id: TraderId,
    pub symbol: Symbol,
    pub side: Side,
    pub kind: OrderKind,
    pub time_in_force: TimeInForce,
    /// Limit price. Required for Limit and StopLimit, absent otherwise.
    pub price: Option<Price>,
    /// Trigger price. Required for Stop and StopLimit, absent otherwise.
    pub stop_price: Option<Price>,
    pub quantity: Quantity,
    /// Milliseconds, assigned by the book on acceptance.
    pub timestamp: i64,
}

impl Order {
    /// Create a limit order.
    pub fn limit(
        order_id: OrderId,
        trader_id: TraderId,
        symbol: Symbol,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Self {
        Self {
            order_id,
            trader_id,
            symbol,
            side,
            kind: OrderKind::Limit,
            time_in_force: TimeInForce::GoodTillCancel,
            price: Some(price),
            stop_price: None,
            quantity,
            timestamp: 0,
        }
    }

    /// Create a market order.
    pub fn market(
        order_id: OrderId,
        trader_id: TraderId,
        symbol: Symbol,
        side: Side,
        quantity: Quantity,
    ) -> Self {
        Self {
            order_id,
            trader_id,
            symbol,
            side,
            kind: OrderKind::Market,
            time_in_force: TimeInForce::GoodTillCancel,
            price: None,
            stop_price: None,
            quantity,
            timestamp: 0,
        }
    }

    /// Create a stop order that becomes a market order when triggered.
    pub fn stop(
        order_id: OrderId,
        trader_id: TraderId,
        symbol: Symbol,
        side: Side,
        stop_price: Price,
        quantity: Quantity,
    ) -> Self {
        Self {
            order_id,
            trader_id,
            symbol,
            side,
            kind: OrderKind::Stop,
            time_in_force: TimeInForce::GoodTillCancel,
            price: None,
            stop_price: Some(stop_price),
            quantity,
            timestamp: 0,
        }
    }

    /// Create a stop-limit order that becomes a limit order when triggered.
    pub fn stop_limit(
        order_id: OrderId,
        trader_id: TraderId,
        symbol: Symbol,
        side: Side,
        price: Price,
        stop_price: Price,
        quantity: Quantity,
    ) -> Self {
        Self {
            order_id,
            trader_id,
            symbol,
            side,
            kind: OrderKind::StopLimit,
            time_in_force: TimeInForce::GoodTillCancel,
            price: Some(price),
            stop_price: Some(stop_price),
            quantity,
            timestamp: 0,
        }
    }

    /// Override the time-in-force tag.
    pub fn with_time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.time_in_force = time_in_force;
        self
    }

    /// True for order kinds that wait in the stop registry.
    pub fn is_stop(&self) -> bool {
        matches!(self.kind, OrderKind::Stop | OrderKind::StopLimit)
    }

    /// The price that gates matching: the limit price for Limit and
    /// StopLimit orders, none for kinds that trade at any price.
    pub fn limit_price(&self) -> Option<Price> {
        match self.kind {
            OrderKind::Limit | OrderKind::StopLimit => self.price,
            OrderKind::Market | OrderKind::Stop => None,
        }
    }

    /// Rewrite the kind when the stop price trades: Stop becomes Market,
    /// StopLimit becomes Limit. The stop price is kept for audit.
    ///
    /// # Panics
    /// Panics if the order is not a stop order.
    pub fn convert_triggered(&mut self) {
        self.kind = match self.kind {
            OrderKind::Stop => OrderKind::Market,
            OrderKind::StopLimit => OrderKind::Limit,
            OrderKind::Limit | OrderKind::Market => {
                unreachable!("only stop orders can trigger")
            }
        };
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {:?} {:?} {} {}",
            self.order_id, self.side, self.kind, self.quantity, self.symbol
        )?;
        if let Some(price) = self.price {
            write!(f, " @ {}", price)?;
        }
        if let Some(stop) = self.stop_price {
            write!(f, " stop {}", stop)?;
        }
        Ok(())
    }
}
