//! Ask (sell-side) ladder.
//!
//! Sell orders keyed by price, best ask first. The map's natural ascending
//! order already puts the lowest price at the front.

use std::collections::BTreeMap;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};

use super::price_level::PriceLevel;
use super::OrderStore;

/// Price-ascending ladder of sell orders.
#[derive(Debug, Default)]
pub struct AskBook {
    /// Price levels sorted ascending; the best ask is the first entry.
    /// BTreeMap keeps iteration deterministic.
    levels: BTreeMap<Price, PriceLevel>,
}

impl AskBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a stored order at its price level, creating the level if absent.
    pub(crate) fn insert(&mut self, store: &mut OrderStore, order_id: OrderId, price: Price) {
        self.levels
            .entry(price)
            .or_default()
            .push_back(store, order_id);
    }

    /// Splice a resting order out of its level, dropping the level if it
    /// empties. The caller guarantees the order rests at `price`.
    pub(crate) fn remove(&mut self, store: &mut OrderStore, order_id: OrderId, price: Price) {
        let level = self
            .levels
            .get_mut(&price)
            .expect("resting order's level must exist");
        level.unlink(store, order_id);
        if level.is_empty() {
            self.levels.remove(&price);
        }
    }

    /// Best ask price and the aggregate quantity at that price.
    pub fn best_ask(&self) -> Option<(Price, Quantity)> {
        self.levels
            .iter()
            .next()
            .map(|(price, level)| (*price, level.total_quantity()))
    }

    /// Best ask price (lowest).
    pub fn best_price(&self) -> Option<Price> {
        self.levels.keys().next().copied()
    }

    /// Mutable access to the best level, for the matching loop.
    pub(crate) fn best_level_mut(&mut self) -> Option<(Price, &mut PriceLevel)> {
        self.levels
            .iter_mut()
            .next()
            .map(|(price, level)| (*price, level))
    }

    /// Drop an emptied level.
    pub(crate) fn drop_level(&mut self, price: Price) {
        let level = self.levels.remove(&price).expect("dropped level must exist");
        assert!(level.is_empty(), "cannot drop a level holding orders");
    }

    /// Top `depth` levels as (price, aggregate quantity), best first.
    pub fn depth_snapshot(&self, depth: usize) -> Vec<(Price, Quantity)> {
        self.levels
            .iter()
            .take(depth)
            .map(|(price, level)| (*price, level.total_quantity()))
            .collect()
    }

    /// All levels best-first, for consistency checks.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&Price, &PriceLevel)> {
        self.levels.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}
