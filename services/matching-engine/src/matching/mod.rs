//! Matching logic: crossing predicates and trade construction.

pub mod crossing;
pub mod sequencer;

pub use crossing::crosses;
pub use sequencer::TradeSequencer;
