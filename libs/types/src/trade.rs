//! Trade execution records.

use crate::ids::{OrderId, Symbol, TradeId};
use crate::numeric::{Price, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An immutable record of two orders crossing.
///
/// The execution price is always the resting order's price: an aggressor
/// willing to pay more (or accept less) trades at the price already on the
/// book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: TradeId,
    /// The just-submitted (or just-triggered) order that caused the cross.
    pub aggressing_order_id: OrderId,
    /// The order that was already on the book.
    pub resting_order_id: OrderId,
    pub symbol: Symbol,
    pub price: Price,
    pub quantity: Quantity,
    /// Milliseconds from the book's clock at the moment of the match.
    pub executed_at: i64,
}

impl Trade {
    pub fn new(
        trade_id: TradeId,
        aggressing_order_id: OrderId,
        resting_order_id: OrderId,
        symbol: Symbol,
        price: Price,
        quantity: Quantity,
        executed_at: i64,
    ) -> Self {
        Self {
            trade_id,
            aggressing_order_id,
            resting_order_id,
            symbol,
            price,
            quantity,
            executed_at,
        }
    }

    /// Trade value (price times quantity).
    pub fn notional(&self) -> Decimal {
        self.price.as_decimal() * self.quantity.as_decimal()
    }
}
