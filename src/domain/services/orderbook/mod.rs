use thiserror::Error;

use crate::domain::models::types::{OrderId, Price, Side, Size};

pub mod orderbook;

pub use self::orderbook::{OrderBook, PriceLevel};

/// Errors that can occur within the order book.
///
/// Covers invalid query arguments, lookups that have no answer and
/// size bookkeeping that would break the resting invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderbookError {
    /// Query price below zero
    #[error("Price cannot be less than zero: {0}")]
    InvalidPrice(Price),

    /// No order rests on the requested side
    #[error("No {0} order in resting orders")]
    NoRestingOrders(Side),

    /// Order not found in the book
    #[error("Order {0} not found in the book")]
    OrderNotFound(OrderId),

    /// Fill size must be positive
    #[error("Invalid fill size: {0}")]
    InvalidSize(Size),

    /// Resting volume on a side would exceed the size range
    #[error("Resting {side} volume cannot take {size} more")]
    VolumeOverflow { side: Side, size: Size },

    /// Fill larger than the resting size
    #[error("Cannot take {requested} from order {id}, only {available} resting")]
    Overfill {
        id: OrderId,
        requested: Size,
        available: Size,
    },
}
