//! The order book and its matching loop.
//!
//! One [`Book`] owns all state for one symbol: the order store, the two
//! ladders, the stop registry, the trade-id sequencer, and the injected
//! clock. Every public operation runs to completion, including any stop
//! cascade, before it returns, and the book's structural invariants hold
//! at every return.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use types::errors::OrderError;
use types::ids::{OrderId, Symbol};
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderKind, Side};
use types::trade::Trade;

use crate::book::{AskBook, BidBook, OrderNode, OrderStore};
use crate::clock::{Clock, SystemClock};
use crate::matching::{crossing, TradeSequencer};
use crate::stops::StopRegistry;

/// Value snapshot of both ladders: (price, aggregate quantity) pairs, bids
/// descending and asks ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub symbol: Symbol,
    pub bids: Vec<(Price, Quantity)>,
    pub asks: Vec<(Price, Quantity)>,
}

/// Single-symbol limit order book with price-time priority matching and
/// stop orders.
pub struct Book {
    symbol: Symbol,
    clock: Box<dyn Clock>,
    /// Sole owner of every live order.
    orders: OrderStore,
    bids: BidBook,
    asks: AskBook,
    stops: StopRegistry,
    /// Stops triggered during the current submission, awaiting their first
    /// matching pass. Always empty between public calls.
    pending_triggered: Vec<OrderId>,
    sequencer: TradeSequencer,
}

impl Book {
    /// Create a book for `symbol` using the system clock.
    pub fn new(symbol: Symbol) -> Self {
        Self::with_clock(symbol, Box::new(SystemClock::new()))
    }

    /// Create a book for `symbol` with an injected clock.
    pub fn with_clock(symbol: Symbol, clock: Box<dyn Clock>) -> Self {
        Self {
            symbol,
            clock,
            orders: OrderStore::new(),
            bids: BidBook::new(),
            asks: AskBook::new(),
            stops: StopRegistry::new(),
            pending_triggered: Vec::new(),
            sequencer: TradeSequencer::new(),
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Submit an order.
    ///
    /// Limit and market orders enter matching immediately; a limit residual
    /// rests on its own side, a market residual is discarded. Stop and
    /// stop-limit orders park in the stop registry and produce no trades on
    /// submission. The returned list carries every trade the submission
    /// caused, stop cascades included, in the order the trades formed.
    pub fn submit(&mut self, mut order: Order) -> Result<Vec<Trade>, OrderError> {
        self.validate(&order)?;
        order.timestamp = self.clock.now_millis();
        debug!(
            order_id = %order.order_id,
            side = ?order.side,
            kind = ?order.kind,
            quantity = %order.quantity,
            "order accepted"
        );

        let mut trades = Vec::new();
        match order.kind {
            OrderKind::Limit | OrderKind::Market => {
                self.run_matching_pass(order, &mut trades);
                self.run_stop_cascade(&mut trades);
            }
            OrderKind::Stop | OrderKind::StopLimit => {
                let order_id = order.order_id;
                self.orders.insert(order_id, OrderNode::new(order));
                self.stops.insert(order_id);
                debug!(order_id = %order_id, "stop order registered");
            }
        }

        self.debug_assert_consistent();
        Ok(trades)
    }

    /// Cancel a resting limit order.
    ///
    /// Unknown ids and orders still waiting in the stop registry are
    /// ignored. For a resting order this is O(1) expected: the store lookup
    /// finds the order, its queue links splice it out of the level, and an
    /// emptied level leaves its ladder.
    pub fn cancel(&mut self, order_id: OrderId) {
        let Some(node) = self.orders.get(&order_id) else {
            debug!(%order_id, "cancel ignored, order not live");
            return;
        };
        if node.order.is_stop() {
            debug!(%order_id, "cancel ignored, order awaits its trigger");
            return;
        }

        let order = &node.order;
        assert_eq!(
            order.kind,
            OrderKind::Limit,
            "only limit orders rest on the book"
        );
        let price = order.price.expect("resting limit order carries a price");
        let side = order.side;

        match side {
            Side::Buy => self.bids.remove(&mut self.orders, order_id, price),
            Side::Sell => self.asks.remove(&mut self.orders, order_id, price),
        }
        self.orders.remove(&order_id);
        info!(%order_id, "order cancelled");

        self.debug_assert_consistent();
    }

    /// Best bid price and aggregate quantity at that price.
    pub fn best_bid(&self) -> Option<(Price, Quantity)> {
        self.bids.best_bid()
    }

    /// Best ask price and aggregate quantity at that price.
    pub fn best_ask(&self) -> Option<(Price, Quantity)> {
        self.asks.best_ask()
    }

    /// Snapshot of the top `depth` levels per side. Pass `usize::MAX` for
    /// the whole book.
    pub fn snapshot(&self, depth: usize) -> BookSnapshot {
        BookSnapshot {
            symbol: self.symbol.clone(),
            bids: self.bids.depth_snapshot(depth),
            asks: self.asks.depth_snapshot(depth),
        }
    }

    /// Look up a live order by id.
    pub fn order(&self, order_id: OrderId) -> Option<&Order> {
        self.orders.get(&order_id).map(|node| &node.order)
    }

    /// Number of live orders (resting plus registered stops).
    pub fn open_orders(&self) -> usize {
        self.orders.len()
    }

    /// Number of trades the book has recorded.
    pub fn trade_count(&self) -> u64 {
        self.sequencer.trades_recorded()
    }

    fn validate(&self, order: &Order) -> Result<(), OrderError> {
        let order_id = order.order_id;
        if order.symbol != self.symbol {
            return Err(OrderError::SymbolMismatch {
                order_id,
                submitted: order.symbol.clone(),
                expected: self.symbol.clone(),
            });
        }
        if order.quantity.is_zero() {
            return Err(OrderError::InvalidQuantity { order_id });
        }
        if matches!(order.kind, OrderKind::Limit | OrderKind::StopLimit) && order.price.is_none() {
            return Err(OrderError::MissingLimitPrice { order_id });
        }
        if order.is_stop() && order.stop_price.is_none() {
            return Err(OrderError::MissingStopPrice { order_id });
        }
        if self.orders.contains_key(&order_id) {
            return Err(OrderError::DuplicateOrderId { order_id });
        }
        Ok(())
    }

    /// One matching pass: cross the aggressor against the opposite ladder,
    /// then rest a limit residual or discard a market one.
    fn run_matching_pass(&mut self, mut order: Order, trades: &mut Vec<Trade>) {
        match order.side {
            Side::Buy => Self::cross_asks(
                &mut order,
                &mut self.asks,
                &mut self.orders,
                &mut self.sequencer,
                self.clock.as_mut(),
                &self.symbol,
                trades,
            ),
            Side::Sell => Self::cross_bids(
                &mut order,
                &mut self.bids,
                &mut self.orders,
                &mut self.sequencer,
                self.clock.as_mut(),
                &self.symbol,
                trades,
            ),
        }

        if order.quantity.is_zero() {
            return;
        }
        match order.kind {
            OrderKind::Limit => self.rest_limit(order),
            OrderKind::Market => {
                debug!(
                    order_id = %order.order_id,
                    remaining = %order.quantity,
                    "market residual discarded, no opposing liquidity"
                );
            }
            OrderKind::Stop | OrderKind::StopLimit => {
                unreachable!("stop orders are converted before they enter matching")
            }
        }
    }

    /// Cross an aggressing buy against the ask ladder, best (lowest) price
    /// first, FIFO within each level.
    fn cross_asks(
        aggressor: &mut Order,
        asks: &mut AskBook,
        orders: &mut OrderStore,
        sequencer: &mut TradeSequencer,
        clock: &mut dyn Clock,
        symbol: &Symbol,
        trades: &mut Vec<Trade>,
    ) {
        while !aggressor.quantity.is_zero() {
            let Some(level_price) = asks.best_price() else {
                break;
            };
            if !crossing::crosses(Side::Buy, aggressor.limit_price(), level_price) {
                break;
            }

            let (_, level) = asks.best_level_mut().expect("best price implies a level");
            while let Some(resting_id) = level.front() {
                if aggressor.quantity.is_zero() {
                    break;
                }
                let resting_quantity = orders
                    .get(&resting_id)
                    .expect("queued order must be in the store")
                    .order
                    .quantity;
                let fill = aggressor.quantity.min(resting_quantity);

                trades.push(sequencer.record(
                    symbol,
                    aggressor.order_id,
                    resting_id,
                    level_price,
                    fill,
                    clock.now_millis(),
                ));
                aggressor.quantity -= fill;

                if fill == resting_quantity {
                    level.unlink(orders, resting_id);
                    orders.remove(&resting_id);
                } else {
                    // partial fill keeps the resting order at the front
                    orders
                        .get_mut(&resting_id)
                        .expect("queued order must be in the store")
                        .order
                        .quantity -= fill;
                    level.reduce(fill);
                }
            }
            if level.is_empty() {
                asks.drop_level(level_price);
            }
        }
    }

    /// Cross an aggressing sell against the bid ladder, best (highest)
    /// price first, FIFO within each level.
    fn cross_bids(
        aggressor: &mut Order,
        bids: &mut BidBook,
        orders: &mut OrderStore,
        sequencer: &mut TradeSequencer,
        clock: &mut dyn Clock,
        symbol: &Symbol,
        trades: &mut Vec<Trade>,
    ) {
        while !aggressor.quantity.is_zero() {
            let Some(level_price) = bids.best_price() else {
                break;
            };
            if !crossing::crosses(Side::Sell, aggressor.limit_price(), level_price) {
                break;
            }

            let (_, level) = bids.best_level_mut().expect("best price implies a level");
            while let Some(resting_id) = level.front() {
                if aggressor.quantity.is_zero() {
                    break;
                }
                let resting_quantity = orders
                    .get(&resting_id)
                    .expect("queued order must be in the store")
                    .order
                    .quantity;
                let fill = aggressor.quantity.min(resting_quantity);

                trades.push(sequencer.record(
                    symbol,
                    aggressor.order_id,
                    resting_id,
                    level_price,
                    fill,
                    clock.now_millis(),
                ));
                aggressor.quantity -= fill;

                if fill == resting_quantity {
                    level.unlink(orders, resting_id);
                    orders.remove(&resting_id);
                } else {
                    // partial fill keeps the resting order at the front
                    orders
                        .get_mut(&resting_id)
                        .expect("queued order must be in the store")
                        .order
                        .quantity -= fill;
                    level.reduce(fill);
                }
            }
            if level.is_empty() {
                bids.drop_level(level_price);
            }
        }
    }

    /// Rest an unfilled limit order on its own side at its limit price.
    fn rest_limit(&mut self, order: Order) {
        let order_id = order.order_id;
        let price = order.price.expect("resting limit order carries a price");
        let side = order.side;

        self.orders.insert(order_id, OrderNode::new(order));
        match side {
            Side::Buy => self.bids.insert(&mut self.orders, order_id, price),
            Side::Sell => self.asks.insert(&mut self.orders, order_id, price),
        }
        debug!(order_id = %order_id, price = %price, "order resting");
    }

    /// Promote and match stops until no trade triggers anything further.
    ///
    /// Every trade in `trades` is scanned against the registry exactly
    /// once. Triggered stops convert (stop to market, stop-limit to limit)
    /// and queue; the queue drains in batches, each batch's matching passes
    /// appending trades that the next scan picks up. The registry only
    /// shrinks and matching passes never refill it, so the loop terminates.
    fn run_stop_cascade(&mut self, trades: &mut Vec<Trade>) {
        let mut scanned = 0;
        loop {
            for index in scanned..trades.len() {
                let trade_price = trades[index].price;
                let fired = self.stops.drain_triggered(trade_price, &self.orders);
                for order_id in &fired {
                    debug!(order_id = %order_id, price = %trade_price, "stop order triggered");
                }
                self.pending_triggered.extend(fired);
            }
            scanned = trades.len();

            if self.pending_triggered.is_empty() {
                break;
            }
            let batch = std::mem::take(&mut self.pending_triggered);
            for order_id in batch {
                let node = self
                    .orders
                    .remove(&order_id)
                    .expect("triggered stop must be in the store");
                let mut order = node.order;
                order.convert_triggered();
                debug!(order_id = %order_id, kind = ?order.kind, "stop order promoted");
                self.run_matching_pass(order, trades);
            }
        }
    }

    /// Verify the structural invariants; debug builds only.
    #[cfg(debug_assertions)]
    fn debug_assert_consistent(&self) {
        let mut queued = 0usize;
        for (price, level) in self.bids.iter() {
            assert!(!level.is_empty(), "bid ladder holds an empty level");
            let mut total = Quantity::zero();
            let mut count = 0usize;
            for node in level.iter(&self.orders) {
                let order = &node.order;
                assert_eq!(order.side, Side::Buy);
                assert_eq!(order.kind, OrderKind::Limit);
                assert_eq!(order.price, Some(*price));
                assert!(!order.quantity.is_zero());
                total += order.quantity;
                count += 1;
            }
            assert_eq!(total, level.total_quantity());
            assert_eq!(count, level.order_count());
            queued += count;
        }
        for (price, level) in self.asks.iter() {
            assert!(!level.is_empty(), "ask ladder holds an empty level");
            let mut total = Quantity::zero();
            let mut count = 0usize;
            for node in level.iter(&self.orders) {
                let order = &node.order;
                assert_eq!(order.side, Side::Sell);
                assert_eq!(order.kind, OrderKind::Limit);
                assert_eq!(order.price, Some(*price));
                assert!(!order.quantity.is_zero());
                total += order.quantity;
                count += 1;
            }
            assert_eq!(total, level.total_quantity());
            assert_eq!(count, level.order_count());
            queued += count;
        }
        for order_id in self.stops.iter() {
            let node = self
                .orders
                .get(&order_id)
                .expect("registered stop must be in the store");
            assert!(node.order.is_stop());
            assert!(node.prev.is_none() && node.next.is_none());
        }
        assert!(
            self.pending_triggered.is_empty(),
            "pending stops must drain before returning"
        );
        assert_eq!(
            queued + self.stops.len(),
            self.orders.len(),
            "every stored order is queued or registered exactly once"
        );
        if let (Some(bid), Some(ask)) = (self.bids.best_price(), self.asks.best_price()) {
            assert!(bid < ask, "book must not be crossed");
        }
    }

    #[cfg(not(debug_assertions))]
    fn debug_assert_consistent(&self) {}
}
