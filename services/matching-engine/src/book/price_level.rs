//! Price level with an intrusive FIFO queue.
//!
//! A price level holds all orders resting at one price, in arrival order.
//! The level stores only head/tail ids and aggregates; the queue itself is
//! threaded through the order store via the prev/next links on each node.
//! That gives O(1) append at the tail and, crucially, O(1) removal of an
//! arbitrary order by id, which is what makes cancellation constant-time.

use super::{OrderNode, OrderStore};
use types::ids::OrderId;
use types::numeric::Quantity;

/// FIFO queue of orders at a single price.
#[derive(Debug, Default)]
pub struct PriceLevel {
    head: Option<OrderId>,
    tail: Option<OrderId>,
    total_quantity: Quantity,
    len: usize,
}

impl PriceLevel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an order at the back of the queue (time priority).
    ///
    /// The order must already be present in the store with clear links.
    pub(crate) fn push_back(&mut self, store: &mut OrderStore, order_id: OrderId) {
        let node = store
            .get_mut(&order_id)
            .expect("queued order must be in the store");
        debug_assert!(node.prev.is_none() && node.next.is_none());
        let quantity = node.order.quantity;
        node.prev = self.tail;
        node.next = None;

        match self.tail {
            Some(tail_id) => {
                store
                    .get_mut(&tail_id)
                    .expect("level tail must be in the store")
                    .next = Some(order_id);
            }
            None => self.head = Some(order_id),
        }
        self.tail = Some(order_id);
        self.total_quantity += quantity;
        self.len += 1;
    }

    /// Splice an order out of the queue in O(1) using its stored links.
    ///
    /// The order's full remaining quantity leaves the level aggregate, so
    /// partial fills must be accounted with [`reduce`](Self::reduce) before
    /// a final unlink.
    pub(crate) fn unlink(&mut self, store: &mut OrderStore, order_id: OrderId) {
        let node = store
            .get_mut(&order_id)
            .expect("unlinked order must be in the store");
        let prev = node.prev.take();
        let next = node.next.take();
        let quantity = node.order.quantity;

        match prev {
            Some(prev_id) => {
                store
                    .get_mut(&prev_id)
                    .expect("predecessor must be in the store")
                    .next = next;
            }
            None => self.head = next,
        }
        match next {
            Some(next_id) => {
                store
                    .get_mut(&next_id)
                    .expect("successor must be in the store")
                    .prev = prev;
            }
            None => self.tail = prev,
        }
        self.total_quantity -= quantity;
        self.len -= 1;
    }

    /// Account a partial fill of an order on this level.
    pub(crate) fn reduce(&mut self, quantity: Quantity) {
        self.total_quantity -= quantity;
    }

    /// The order at the front of the queue, i.e. the one with time priority.
    pub(crate) fn front(&self) -> Option<OrderId> {
        self.head
    }

    /// Walk the queue from the front in priority order.
    pub(crate) fn iter<'a>(&self, store: &'a OrderStore) -> impl Iterator<Item = &'a OrderNode> {
        std::iter::successors(self.head.map(|id| node(store, id)), |current| {
            current.next.map(|id| node(store, id))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total remaining quantity across all orders at this level.
    pub fn total_quantity(&self) -> Quantity {
        self.total_quantity
    }

    pub fn order_count(&self) -> usize {
        self.len
    }
}

fn node(store: &OrderStore, order_id: OrderId) -> &OrderNode {
    store
        .get(&order_id)
        .expect("linked order must be in the store")
}
