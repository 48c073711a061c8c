//! Stop order registry.
//!
//! Stop and stop-limit orders wait here, dormant, until a trade price
//! satisfies their trigger condition. A buy stop fires when a trade prints
//! at or above its stop price; a sell stop fires at or below. The registry
//! keeps insertion order, and stops triggered by the same trade fire in
//! that order.

use crate::book::OrderStore;
use types::ids::OrderId;
use types::numeric::Price;
use types::order::Side;

/// Untriggered stop orders, by id, in insertion order.
#[derive(Debug, Default)]
pub struct StopRegistry {
    resting: Vec<OrderId>,
}

impl StopRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, order_id: OrderId) {
        self.resting.push(order_id);
    }

    /// Remove and return every stop whose trigger condition `trade_price`
    /// satisfies, in insertion order.
    pub(crate) fn drain_triggered(
        &mut self,
        trade_price: Price,
        store: &OrderStore,
    ) -> Vec<OrderId> {
        let mut triggered = Vec::new();
        self.resting.retain(|order_id| {
            let order = &store
                .get(order_id)
                .expect("registered stop must be in the store")
                .order;
            let stop_price = order
                .stop_price
                .expect("registered stop must carry a stop price");
            let fires = match order.side {
                Side::Buy => trade_price >= stop_price,
                Side::Sell => trade_price <= stop_price,
            };
            if fires {
                triggered.push(*order_id);
            }
            !fires
        });
        triggered
    }

    pub fn contains(&self, order_id: OrderId) -> bool {
        self.resting.contains(&order_id)
    }

    pub fn len(&self) -> usize {
        self.resting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resting.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = OrderId> + '_ {
        self.resting.iter().copied()
    }
}
