use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::models::orderbook::{LevelSummary, SendOutcome};
use crate::domain::models::types::{Order, OrderId, Price, Side, Size};
use crate::domain::services::orderbook::OrderbookError;

pub mod matching_engine;

/// Re-export key types for convenience
pub use self::matching_engine::MatchingEngine;

/// Type alias for Result with MatchingError
pub type MatchingResult<T> = Result<T, MatchingError>;

/// Errors that can occur during matching engine operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchingError {
    /// An order with this id is already resting
    #[error("Id of order must be unique: {0} is already resting")]
    DuplicateOrderId(OrderId),

    /// Price or size is not strictly positive
    #[error("Price and size must be greater than zero (price: {price}, size: {size})")]
    InvalidOrder { price: Price, size: Size },

    /// The id is not resting
    #[error("Cannot find an order with id: {0}")]
    OrderNotFound(OrderId),

    /// The best opposing order sits on the same side as the incoming one
    #[error("Order book corrupted: order {order_id} paired with order {opposing_id}, both {side}")]
    CorruptBook {
        order_id: OrderId,
        opposing_id: OrderId,
        side: Side,
    },

    /// Orderbook error occurred
    #[error(transparent)]
    Orderbook(#[from] OrderbookError),
}

/// Coarse classification of a [`MatchingError`], so callers can branch without
/// inspecting messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The request was refused before touching the book.
    Rejected,
    /// The id or side queried has nothing resting.
    NotFound,
    /// A query argument is out of range.
    InvalidArgument,
    /// The engine detected broken book state.
    Corrupt,
}

impl MatchingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateOrderId(_) | Self::InvalidOrder { .. } => ErrorKind::Rejected,
            Self::OrderNotFound(_) => ErrorKind::NotFound,
            Self::CorruptBook { .. } => ErrorKind::Corrupt,
            Self::Orderbook(err) => match err {
                OrderbookError::InvalidPrice(_) => ErrorKind::InvalidArgument,
                OrderbookError::VolumeOverflow { .. } => ErrorKind::Rejected,
                OrderbookError::NoRestingOrders(_) | OrderbookError::OrderNotFound(_) => {
                    ErrorKind::NotFound
                }
                OrderbookError::InvalidSize(_) | OrderbookError::Overfill { .. } => {
                    ErrorKind::Corrupt
                }
            },
        }
    }
}

/// Intake and mutation contract of the exchange.
pub trait OrderEntry {
    /// Submits an order, crossing it against the book and resting any remainder.
    fn send(&mut self, order_id: OrderId, side: Side, price: Price, size: Size) -> MatchingResult<SendOutcome>;

    /// Replaces price and size of a resting order without re-running the crossing.
    fn modify(&mut self, order_id: OrderId, price: Price, size: Size) -> MatchingResult<Order>;

    /// Removes a resting order.
    fn cancel(&mut self, order_id: OrderId) -> MatchingResult<Order>;
}

/// Read-only queries over the resting book.
pub trait BookQuery {
    /// Resting size an order on `side` at `price` could trade against.
    fn total_size_at_price(&self, price: Price, side: Side) -> MatchingResult<Size>;

    fn highest_buy_price(&self) -> MatchingResult<Order>;

    fn lowest_sell_price(&self) -> MatchingResult<Order>;

    fn depth(&self, side: Side, levels: usize) -> Vec<LevelSummary>;

    fn resting_orders(&self) -> Vec<Order>;
}
