//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module implements the matching engine: order intake, the crossing loop that pairs an
// incoming order with the best opposing resting orders, and modify/cancel of resting state.
//
// | Component                | Description                                                |
// |--------------------------|------------------------------------------------------------|
// | MatchingEngine           | Owns the order book and runs every mutation on it          |
// | SendOutcome              | Fills produced by a send and the resting remainder         |
// | CrossStep                | One pairing attempt: a fill, or no crossing counterparty   |
//
//--------------------------------------------------------------------------------------------------
// FUNCTIONS
//--------------------------------------------------------------------------------------------------
// | Name                    | Description                                       | Return Type         |
// |-------------------------|---------------------------------------------------|---------------------|
// | send                    | Validate, cross, rest the remainder               | Result<SendOutcome> |
// | modify                  | Replace price/size of a resting order             | Result<Order>       |
// | cancel                  | Remove a resting order                            | Result<Order>       |
// | total_size_at_price     | Crossing size available at a price                | Result<Size>        |
// | highest_buy_price       | Best resting buy                                  | Result<Order>       |
// | lowest_sell_price       | Best resting sell                                 | Result<Order>       |
//--------------------------------------------------------------------------------------------------

use tracing::{debug, error, trace, warn};

use super::{BookQuery, MatchingError, MatchingResult, OrderEntry};
use crate::domain::models::orderbook::{CrossStep, LevelSummary, SendOutcome};
use crate::domain::models::types::{Fill, Order, OrderId, Price, Side, Size};
use crate::domain::services::orderbook::OrderBook;

/// The matching engine for a single instrument.
///
/// Single-threaded and synchronous: every call runs to completion, and callers
/// sharing an engine across threads must serialize access themselves.
#[derive(Debug, Default)]
pub struct MatchingEngine {
    /// The resting order book, owned exclusively by this engine
    order_book: OrderBook,
}

impl MatchingEngine {
    /// Creates a new matching engine with an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine whose book pre-allocates room for `capacity` resting orders.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            order_book: OrderBook::with_capacity(capacity),
        }
    }

    /// Processes a new order.
    ///
    /// # Order Processing Flow
    ///
    /// 1. Rejects an id that is already resting
    /// 2. Rejects a non-positive price or size
    /// 3. On an empty book, rests the order directly
    /// 4. Otherwise crosses against the best opposing orders until the order is
    ///    filled or nothing crosses, then rests any remainder
    ///
    /// # Errors
    ///
    /// * `DuplicateOrderId` / `InvalidOrder` before any mutation
    /// * `VolumeOverflow` (from the book) before any mutation, when the resting size on
    ///   the order's side could no longer be represented
    /// * `CorruptBook` if the book hands back a same-side order; the send is aborted
    ///   and the incoming order is not rested
    pub fn send(&mut self, order_id: OrderId, side: Side, price: Price, size: Size) -> MatchingResult<SendOutcome> {
        if self.order_book.contains(order_id) {
            warn!(order_id, "rejected send: duplicate order id");
            return Err(MatchingError::DuplicateOrderId(order_id));
        }
        if price <= 0 || size <= 0 {
            warn!(order_id, price, size, "rejected send: non-positive price or size");
            return Err(MatchingError::InvalidOrder { price, size });
        }
        // The remainder never exceeds `size`, so this covers whatever ends up resting
        if let Err(e) = self.order_book.check_volume(side, size) {
            warn!(order_id, %side, size, "rejected send: resting volume would overflow");
            return Err(e.into());
        }

        let mut order = Order::new(order_id, side, price, size);
        let mut fills = Vec::new();

        if self.order_book.is_empty() {
            debug!(order_id, "empty book, resting without crossing");
        } else {
            while order.size > 0 {
                match self.cross_step(&mut order)? {
                    CrossStep::Matched(fill) => fills.push(fill),
                    CrossStep::NoMatch => break,
                }
            }
        }

        let resting = if order.size > 0 {
            debug!(order_id, %side, price, size = order.size, "order resting");
            self.order_book.insert(order)?;
            self.order_book.get(order_id).cloned()
        } else {
            debug!(order_id, fills = fills.len(), "order fully filled");
            None
        };

        Ok(SendOutcome { order_id, fills, resting })
    }

    /// Pairs `order` with the best opposing resting order once.
    ///
    /// Crossing size is positive exactly when the best opposing price crosses,
    /// so only the top of the opposite side is inspected.
    fn cross_step(&mut self, order: &mut Order) -> MatchingResult<CrossStep> {
        let opposing = match self.order_book.peek_best_order(order.side.opposite()) {
            Some(opposing) if order.side.crosses(order.price, opposing.price) => opposing,
            _ => return Ok(CrossStep::NoMatch),
        };

        // Only reachable if an order were filed under the wrong side of the book
        if opposing.side == order.side {
            error!(order_id = order.id, opposing_id = opposing.id, side = %order.side, "same-side pairing in crossing loop");
            return Err(MatchingError::CorruptBook {
                order_id: order.id,
                opposing_id: opposing.id,
                side: order.side,
            });
        }

        let fill = Fill {
            maker_id: opposing.id,
            taker_id: order.id,
            price: opposing.price,
            size: order.size.min(opposing.size),
        };

        self.order_book.fill(fill.maker_id, fill.size)?;
        order.size -= fill.size;

        trace!(taker = fill.taker_id, maker = fill.maker_id, price = fill.price, size = fill.size, "crossed");
        Ok(CrossStep::Matched(fill))
    }

    /// Overwrites price and size of a resting order.
    ///
    /// The crossing loop is not re-run, so a modify can leave the book crossed.
    /// A pure size reduction keeps time priority; any other change loses it.
    ///
    /// # Errors
    ///
    /// * `OrderNotFound` if the id is not resting
    /// * `InvalidOrder` for a non-positive price or size
    /// * `VolumeOverflow` (from the book) when a size increase would overflow the side volume
    pub fn modify(&mut self, order_id: OrderId, price: Price, size: Size) -> MatchingResult<Order> {
        if !self.order_book.contains(order_id) {
            warn!(order_id, "rejected modify: unknown order id");
            return Err(MatchingError::OrderNotFound(order_id));
        }
        if price <= 0 || size <= 0 {
            warn!(order_id, price, size, "rejected modify: non-positive price or size");
            return Err(MatchingError::InvalidOrder { price, size });
        }

        let order = self.order_book.amend(order_id, price, size)?;
        debug!(order_id, price, size, "order modified");
        Ok(order)
    }

    /// Cancels a resting order and returns it.
    pub fn cancel(&mut self, order_id: OrderId) -> MatchingResult<Order> {
        if !self.order_book.contains(order_id) {
            warn!(order_id, "rejected cancel: unknown order id");
            return Err(MatchingError::OrderNotFound(order_id));
        }

        let order = self.order_book.remove(order_id)?;
        debug!(order_id, "order cancelled");
        Ok(order)
    }

    pub fn total_size_at_price(&self, price: Price, side: Side) -> MatchingResult<Size> {
        Ok(self.order_book.total_size_at_price(price, side)?)
    }

    pub fn highest_buy_price(&self) -> MatchingResult<Order> {
        Ok(self.order_book.best_buy()?)
    }

    pub fn lowest_sell_price(&self) -> MatchingResult<Order> {
        Ok(self.order_book.best_sell()?)
    }

    /// Gets the current state of the order book.
    pub fn order_book(&self) -> &OrderBook {
        &self.order_book
    }
}

impl OrderEntry for MatchingEngine {
    fn send(&mut self, order_id: OrderId, side: Side, price: Price, size: Size) -> MatchingResult<SendOutcome> {
        MatchingEngine::send(self, order_id, side, price, size)
    }

    fn modify(&mut self, order_id: OrderId, price: Price, size: Size) -> MatchingResult<Order> {
        MatchingEngine::modify(self, order_id, price, size)
    }

    fn cancel(&mut self, order_id: OrderId) -> MatchingResult<Order> {
        MatchingEngine::cancel(self, order_id)
    }
}

impl BookQuery for MatchingEngine {
    fn total_size_at_price(&self, price: Price, side: Side) -> MatchingResult<Size> {
        MatchingEngine::total_size_at_price(self, price, side)
    }

    fn highest_buy_price(&self) -> MatchingResult<Order> {
        MatchingEngine::highest_buy_price(self)
    }

    fn lowest_sell_price(&self) -> MatchingResult<Order> {
        MatchingEngine::lowest_sell_price(self)
    }

    fn depth(&self, side: Side, levels: usize) -> Vec<LevelSummary> {
        self.order_book.depth(side, levels)
    }

    fn resting_orders(&self) -> Vec<Order> {
        self.order_book.resting_orders()
    }
}
