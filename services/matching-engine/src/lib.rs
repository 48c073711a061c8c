//! Single-symbol limit order book matching engine.
//!
//! Deterministic, in-memory price-time priority matching: submissions and
//! cancellations come in, trades come out. Limit and market orders cross
//! the opposite ladder immediately; stop and stop-limit orders wait in a
//! registry and re-enter matching when a trade reaches their trigger
//! price, with the whole cascade resolved before the submission returns.
//!
//! **Key invariants:**
//! - Price-time priority strictly enforced (best price, then FIFO)
//! - Deterministic matching (same inputs, same outputs)
//! - Trades execute at the resting order's price
//! - Trade ids are contiguous from 1
//!
//! The engine is single-threaded; a concurrent host must serialize access.

pub mod book;
pub mod clock;
pub mod engine;
pub mod matching;
pub mod stops;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{Book, BookSnapshot};
