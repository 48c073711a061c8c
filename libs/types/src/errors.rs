//! Error types surfaced by the matching engine.

use crate::ids::{OrderId, Symbol};
use thiserror::Error;

/// Rejection reasons for a submitted order.
///
/// Cancelling an unknown id is deliberately not an error: cancel is a
/// silent no-op in that case. Internal book corruption is a programming
/// error and panics instead of appearing here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("order {order_id}: quantity must be positive")]
    InvalidQuantity { order_id: OrderId },

    #[error("order {order_id}: a limit price is required for this order kind")]
    MissingLimitPrice { order_id: OrderId },

    #[error("order {order_id}: a stop price is required for this order kind")]
    MissingStopPrice { order_id: OrderId },

    #[error("order {order_id}: symbol {submitted} does not match book symbol {expected}")]
    SymbolMismatch {
        order_id: OrderId,
        submitted: Symbol,
        expected: Symbol,
    },

    #[error("order id {order_id} is already live")]
    DuplicateOrderId { order_id: OrderId },
}
