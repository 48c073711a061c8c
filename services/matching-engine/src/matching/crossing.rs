//! Crossing detection.
//!
//! Decides whether an aggressing order may trade at an opposite-side level
//! price. A buy crosses levels priced at or below its limit, a sell crosses
//! levels priced at or above it. An order without a limit price (market, or
//! a triggered stop) crosses every level.

use types::numeric::Price;
use types::order::Side;

/// True when an aggressor on `side` with `limit_price` may trade at
/// `level_price`.
pub fn crosses(side: Side, limit_price: Option<Price>, level_price: Price) -> bool {
    let Some(limit) = limit_price else {
        return true;
    };
    match side {
        Side::Buy => limit >= level_price,
        Side::Sell => limit <= level_price,
    }
}
