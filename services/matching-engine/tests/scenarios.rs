//! End-to-end matching scenarios exercised through the public Book API.

use matching_engine::{Book, ManualClock};
use types::errors::OrderError;
use types::ids::{OrderId, Symbol, TraderId};
use types::numeric::{Price, Quantity};
use types::order::{Order, Side, TimeInForce};

fn book() -> Book {
    Book::with_clock(Symbol::new("TEST"), Box::new(ManualClock::new(1_000)))
}

fn limit(id: u64, side: Side, price: u64, quantity: u64) -> Order {
    Order::limit(
        OrderId::new(id),
        TraderId::new(1),
        Symbol::new("TEST"),
        side,
        Price::from_u64(price),
        Quantity::new(quantity),
    )
}

fn market(id: u64, side: Side, quantity: u64) -> Order {
    Order::market(
        OrderId::new(id),
        TraderId::new(1),
        Symbol::new("TEST"),
        side,
        Quantity::new(quantity),
    )
}

fn stop(id: u64, side: Side, stop_price: u64, quantity: u64) -> Order {
    Order::stop(
        OrderId::new(id),
        TraderId::new(1),
        Symbol::new("TEST"),
        side,
        Price::from_u64(stop_price),
        Quantity::new(quantity),
    )
}

fn stop_limit(id: u64, side: Side, price: u64, stop_price: u64, quantity: u64) -> Order {
    Order::stop_limit(
        OrderId::new(id),
        TraderId::new(1),
        Symbol::new("TEST"),
        side,
        Price::from_u64(price),
        Price::from_u64(stop_price),
        Quantity::new(quantity),
    )
}

#[test]
fn uncrossed_buy_rests_on_the_bid_ladder() {
    let mut book = book();
    let trades = book.submit(limit(1, Side::Buy, 100, 10)).unwrap();

    assert!(trades.is_empty());
    assert_eq!(
        book.best_bid(),
        Some((Price::from_u64(100), Quantity::new(10)))
    );
    assert_eq!(book.best_ask(), None);
}

#[test]
fn equal_priced_sell_crosses_fully() {
    let mut book = book();
    book.submit(limit(1, Side::Buy, 100, 10)).unwrap();
    let trades = book.submit(limit(2, Side::Sell, 100, 10)).unwrap();

    assert_eq!(trades.len(), 1);
    let trade = &trades[0];
    assert_eq!(trade.trade_id.value(), 1);
    assert_eq!(trade.aggressing_order_id, OrderId::new(2));
    assert_eq!(trade.resting_order_id, OrderId::new(1));
    assert_eq!(trade.price, Price::from_u64(100));
    assert_eq!(trade.quantity, Quantity::new(10));

    assert_eq!(book.best_bid(), None);
    assert_eq!(book.best_ask(), None);
}

#[test]
fn partial_fill_leaves_the_residual_resting() {
    let mut book = book();
    book.submit(limit(1, Side::Buy, 100, 10)).unwrap();
    let trades = book.submit(limit(2, Side::Sell, 100, 4)).unwrap();

    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].quantity, Quantity::new(4));
    assert_eq!(
        book.best_bid(),
        Some((Price::from_u64(100), Quantity::new(6)))
    );
    assert_eq!(book.best_ask(), None);
}

#[test]
fn market_order_sweeps_best_levels_first() {
    let mut book = book();
    book.submit(limit(1, Side::Buy, 99, 5)).unwrap();
    book.submit(limit(2, Side::Buy, 100, 5)).unwrap();

    let trades = book.submit(market(3, Side::Sell, 7)).unwrap();

    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].resting_order_id, OrderId::new(2));
    assert_eq!(trades[0].price, Price::from_u64(100));
    assert_eq!(trades[0].quantity, Quantity::new(5));
    assert_eq!(trades[1].resting_order_id, OrderId::new(1));
    assert_eq!(trades[1].price, Price::from_u64(99));
    assert_eq!(trades[1].quantity, Quantity::new(2));

    assert_eq!(
        book.best_bid(),
        Some((Price::from_u64(99), Quantity::new(3)))
    );
    assert_eq!(book.best_ask(), None);
}

#[test]
fn fifo_within_a_price_level() {
    let mut book = book();
    book.submit(limit(1, Side::Buy, 100, 5)).unwrap();
    book.submit(limit(2, Side::Buy, 100, 5)).unwrap();

    let trades = book.submit(limit(3, Side::Sell, 100, 6)).unwrap();

    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].resting_order_id, OrderId::new(1));
    assert_eq!(trades[0].quantity, Quantity::new(5));
    assert_eq!(trades[1].resting_order_id, OrderId::new(2));
    assert_eq!(trades[1].quantity, Quantity::new(1));

    assert_eq!(
        book.best_bid(),
        Some((Price::from_u64(100), Quantity::new(4)))
    );
}

#[test]
fn earlier_order_fully_consumed_before_later_one_fills() {
    let mut book = book();
    book.submit(limit(1, Side::Buy, 100, 5)).unwrap();
    book.submit(limit(2, Side::Buy, 100, 5)).unwrap();

    // smaller than the first order: only order 1 may fill
    let trades = book.submit(limit(3, Side::Sell, 100, 3)).unwrap();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].resting_order_id, OrderId::new(1));

    // a partial fill does not cost the head its priority
    let trades = book.submit(limit(4, Side::Sell, 100, 3)).unwrap();
    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].resting_order_id, OrderId::new(1));
    assert_eq!(trades[0].quantity, Quantity::new(2));
    assert_eq!(trades[1].resting_order_id, OrderId::new(2));
    assert_eq!(trades[1].quantity, Quantity::new(1));
}

#[test]
fn triggered_stop_with_no_liquidity_is_discarded() {
    let mut book = book();
    book.submit(limit(1, Side::Buy, 100, 10)).unwrap();
    let trades = book.submit(stop(2, Side::Sell, 100, 10)).unwrap();
    assert!(trades.is_empty());

    // the cross consumes the whole bid side, then triggers the stop, which
    // finds nothing to sell into and is discarded
    let trades = book.submit(limit(3, Side::Sell, 100, 10)).unwrap();

    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].aggressing_order_id, OrderId::new(3));
    assert_eq!(trades[0].resting_order_id, OrderId::new(1));
    assert!(book.order(OrderId::new(2)).is_none());
    assert_eq!(book.open_orders(), 0);
    assert_eq!(book.best_bid(), None);
    assert_eq!(book.best_ask(), None);
}

#[test]
fn stop_cascade_appends_trades_in_trigger_order() {
    let mut book = book();
    book.submit(limit(1, Side::Buy, 100, 5)).unwrap();
    book.submit(limit(2, Side::Buy, 95, 5)).unwrap();
    book.submit(stop(3, Side::Sell, 100, 5)).unwrap();
    book.submit(stop(4, Side::Sell, 95, 5)).unwrap();

    // the direct cross prints 100, which fires stop 3; its market sell
    // prints 95, which fires stop 4; stop 4 finds an empty bid side
    let trades = book.submit(limit(5, Side::Sell, 100, 5)).unwrap();

    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].aggressing_order_id, OrderId::new(5));
    assert_eq!(trades[0].price, Price::from_u64(100));
    assert_eq!(trades[1].aggressing_order_id, OrderId::new(3));
    assert_eq!(trades[1].price, Price::from_u64(95));
    assert_eq!(trades[1].resting_order_id, OrderId::new(2));

    // ids stay contiguous across the cascade
    assert_eq!(trades[0].trade_id.value(), 1);
    assert_eq!(trades[1].trade_id.value(), 2);

    assert_eq!(book.open_orders(), 0);
}

#[test]
fn triggered_stop_limit_rests_at_its_limit_price() {
    let mut book = book();
    book.submit(stop_limit(1, Side::Buy, 99, 100, 5)).unwrap();
    book.submit(limit(2, Side::Sell, 100, 5)).unwrap();

    // the cross at 100 triggers the stop-limit; as a buy limit at 99 it
    // crosses nothing and rests on the bid ladder
    let trades = book.submit(limit(3, Side::Buy, 100, 5)).unwrap();
    assert_eq!(trades.len(), 1);

    assert_eq!(
        book.best_bid(),
        Some((Price::from_u64(99), Quantity::new(5)))
    );
    let resting = book.order(OrderId::new(1)).unwrap();
    assert_eq!(resting.price, Some(Price::from_u64(99)));

    // once resting it cancels like any limit order
    book.cancel(OrderId::new(1));
    assert_eq!(book.best_bid(), None);
}

#[test]
fn pre_satisfied_stop_waits_for_the_next_trade() {
    let mut book = book();
    book.submit(limit(1, Side::Buy, 100, 5)).unwrap();
    // best bid already satisfies the trigger condition, but no trade has
    // printed, so the stop stays dormant
    let trades = book.submit(stop(2, Side::Sell, 105, 5)).unwrap();
    assert!(trades.is_empty());
    assert_eq!(book.open_orders(), 2);
    assert_eq!(
        book.best_bid(),
        Some((Price::from_u64(100), Quantity::new(5)))
    );
}

#[test]
fn trade_ids_are_contiguous_across_the_session() {
    let mut book = book();
    let mut ids = Vec::new();

    book.submit(limit(1, Side::Buy, 100, 5)).unwrap();
    ids.extend(book.submit(limit(2, Side::Sell, 100, 2)).unwrap());
    ids.extend(book.submit(limit(3, Side::Sell, 100, 2)).unwrap());
    book.submit(limit(4, Side::Sell, 101, 5)).unwrap();
    ids.extend(book.submit(limit(5, Side::Buy, 101, 6)).unwrap());

    let observed: Vec<u64> = ids.iter().map(|t| t.trade_id.value()).collect();
    assert_eq!(observed, vec![1, 2, 3]);
    assert_eq!(book.trade_count(), 3);
}

#[test]
fn executed_quantity_is_conserved() {
    let mut book = book();
    book.submit(limit(1, Side::Sell, 100, 4)).unwrap();
    book.submit(limit(2, Side::Sell, 101, 4)).unwrap();
    book.submit(limit(3, Side::Sell, 102, 4)).unwrap();

    let trades = book.submit(limit(4, Side::Buy, 101, 10)).unwrap();

    let executed: Quantity = trades.iter().map(|t| t.quantity).sum();
    assert_eq!(executed, Quantity::new(8));
    // aggressor decrease: 10 submitted, 2 rest
    assert_eq!(
        book.best_bid(),
        Some((Price::from_u64(101), Quantity::new(2)))
    );
    // resting decrease: levels 100 and 101 gone, 102 untouched
    assert_eq!(
        book.best_ask(),
        Some((Price::from_u64(102), Quantity::new(4)))
    );
}

#[test]
fn cancel_is_idempotent_and_final() {
    let mut book = book();
    book.submit(limit(1, Side::Buy, 100, 10)).unwrap();
    book.submit(limit(2, Side::Buy, 100, 10)).unwrap();

    book.cancel(OrderId::new(1));
    book.cancel(OrderId::new(1)); // already gone
    book.cancel(OrderId::new(99)); // never existed

    assert_eq!(
        book.best_bid(),
        Some((Price::from_u64(100), Quantity::new(10)))
    );

    // the cancelled order can no longer trade
    let trades = book.submit(limit(3, Side::Sell, 100, 20)).unwrap();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0].resting_order_id, OrderId::new(2));
    assert_eq!(
        book.best_ask(),
        Some((Price::from_u64(100), Quantity::new(10)))
    );
}

#[test]
fn cancelling_the_middle_of_a_level_preserves_fifo() {
    let mut book = book();
    book.submit(limit(1, Side::Buy, 100, 1)).unwrap();
    book.submit(limit(2, Side::Buy, 100, 2)).unwrap();
    book.submit(limit(3, Side::Buy, 100, 3)).unwrap();

    book.cancel(OrderId::new(2));
    assert_eq!(
        book.best_bid(),
        Some((Price::from_u64(100), Quantity::new(4)))
    );

    let trades = book.submit(limit(4, Side::Sell, 100, 4)).unwrap();
    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].resting_order_id, OrderId::new(1));
    assert_eq!(trades[1].resting_order_id, OrderId::new(3));
}

#[test]
fn book_never_rests_crossed() {
    let mut book = book();
    book.submit(limit(1, Side::Sell, 100, 5)).unwrap();
    // aggressive buy above the ask consumes it and rests the remainder
    let trades = book.submit(limit(2, Side::Buy, 103, 8)).unwrap();
    assert_eq!(trades.len(), 1);

    book.submit(limit(3, Side::Sell, 104, 5)).unwrap();
    let (bid, _) = book.best_bid().unwrap();
    let (ask, _) = book.best_ask().unwrap();
    assert!(bid < ask);
}

#[test]
fn time_in_force_is_stored_but_does_not_gate_matching() {
    let mut book = book();
    let order = limit(1, Side::Buy, 100, 10).with_time_in_force(TimeInForce::ImmediateOrCancel);
    let trades = book.submit(order).unwrap();

    // an IOC tag does not stop the residual from resting today
    assert!(trades.is_empty());
    assert_eq!(
        book.best_bid(),
        Some((Price::from_u64(100), Quantity::new(10)))
    );
    assert_eq!(
        book.order(OrderId::new(1)).unwrap().time_in_force,
        TimeInForce::ImmediateOrCancel
    );
}

#[test]
fn rejected_submission_leaves_no_trace() {
    let mut book = book();
    book.submit(limit(1, Side::Buy, 100, 10)).unwrap();

    let err = book.submit(limit(1, Side::Sell, 100, 10)).unwrap_err();
    assert_eq!(
        err,
        OrderError::DuplicateOrderId {
            order_id: OrderId::new(1)
        }
    );
    assert_eq!(book.open_orders(), 1);
    assert_eq!(book.best_ask(), None);
    assert_eq!(book.trade_count(), 0);
}

#[test]
fn snapshot_serializes_for_embedders() {
    let mut book = book();
    book.submit(limit(1, Side::Buy, 100, 10)).unwrap();
    book.submit(limit(2, Side::Sell, 101, 5)).unwrap();

    let snapshot = book.snapshot(usize::MAX);
    let json = serde_json::to_string(&snapshot).unwrap();
    let back: matching_engine::BookSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(snapshot, back);
}
