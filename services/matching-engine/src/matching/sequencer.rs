//! Trade construction and id sequencing.

use types::ids::{OrderId, Symbol, TradeId};
use types::numeric::{Price, Quantity};
use types::trade::Trade;

/// Owns the book's trade-id counter and builds trade records.
///
/// Ids start at 1 and are contiguous, so `trades_recorded` doubles as the
/// id of the most recent trade.
#[derive(Debug)]
pub struct TradeSequencer {
    next_trade_id: u64,
}

impl TradeSequencer {
    pub fn new() -> Self {
        Self { next_trade_id: 1 }
    }

    /// Record a fill at the resting level's price.
    pub fn record(
        &mut self,
        symbol: &Symbol,
        aggressing_order_id: OrderId,
        resting_order_id: OrderId,
        price: Price,
        quantity: Quantity,
        executed_at: i64,
    ) -> Trade {
        debug_assert!(!quantity.is_zero(), "trades carry positive quantity");
        let trade_id = TradeId::new(self.next_trade_id);
        self.next_trade_id += 1;
        Trade::new(
            trade_id,
            aggressing_order_id,
            resting_order_id,
            symbol.clone(),
            price,
            quantity,
            executed_at,
        )
    }

    /// Number of trades recorded so far.
    pub fn trades_recorded(&self) -> u64 {
        self.next_trade_id - 1
    }
}

impl Default for TradeSequencer {
    fn default() -> Self {
        Self::new()
    }
}
