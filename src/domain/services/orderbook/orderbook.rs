//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module implements the resting order book for a single instrument.
// Orders are kept in price-time priority: price levels are ordered by price and
// orders inside a level are served first-in-first-out.
//
// | Component     | Description                                                               |
// |---------------|---------------------------------------------------------------------------|
// | OrderBook     | Owns every resting order and answers size/price queries                  |
// | PriceLevel    | FIFO queue of order ids at one price with a running total size           |
// | Order index   | Id to order map, the only place the order values live                    |
//
//--------------------------------------------------------------------------------------------------
// FUNCTIONS
//--------------------------------------------------------------------------------------------------
// | Name                  | Description                                  | Return Type                |
// |-----------------------|----------------------------------------------|----------------------------|
// | insert                | Adds or overwrites an order                  | Result<()>                 |
// | check_volume          | Side volume stays within the size range      | Result<()>                 |
// | remove                | Removes an order by id                       | Result<Order>              |
// | total_size_at_price   | Size an incoming order at price could cross  | Result<Size>               |
// | best_buy / best_sell  | Most competitive order on a side             | Result<Order>              |
// | fill                  | Takes size off a resting order               | Result<Order>              |
// | amend                 | Replaces price and size of a resting order   | Result<Order>              |
// | depth                 | Aggregated levels, best first                | Vec<LevelSummary>          |
// | resting_orders        | Snapshot in price-time order                 | Vec<Order>                 |
//
//--------------------------------------------------------------------------------------------------
// TESTS
//--------------------------------------------------------------------------------------------------
// | Name                               | Description                                          |
// |------------------------------------|------------------------------------------------------|
// | test_empty_orderbook               | Verifies initial empty state                         |
// | test_insert_and_remove             | Basic insert/remove bookkeeping                      |
// | test_insert_overwrites_same_id     | Re-inserting an id replaces the old entry            |
// | test_total_size_at_price           | Crossing totals for both sides                       |
// | test_total_size_negative_price     | Negative query price is rejected                     |
// | test_best_orders                   | Best buy/sell and empty side errors                  |
// | test_fifo_tie_break                | Equal prices served in arrival order                 |
// | test_fill_partial_and_full         | Fill decrements and removes at zero                  |
// | test_fill_errors                   | Overfill, bad size and unknown id                    |
// | test_amend_priority                | Size reduction keeps priority, other changes lose it |
// | test_depth_and_spread              | Aggregated depth and spread                          |
// | test_resting_orders_and_display    | Snapshot ordering and Display                        |
// | test_volume_limit                  | Side volume overflow is refused without mutating     |
//--------------------------------------------------------------------------------------------------

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;

use tracing::trace;

use super::OrderbookError;
use crate::domain::models::orderbook::LevelSummary;
use crate::domain::models::types::{Order, OrderId, Price, Side, Size};

/// Represents a price level in the order book, maintaining a FIFO queue of order ids
/// at the same price point.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    /// The price for this level
    pub price: Price,
    /// FIFO queue of order ids at this price level
    pub orders: VecDeque<OrderId>,
    /// Total resting size of all orders at this price level
    pub total_size: Size,
}

impl PriceLevel {
    pub fn new(price: Price) -> Self {
        Self {
            price,
            orders: VecDeque::with_capacity(4),
            total_size: 0,
        }
    }

    /// Returns the id of the next order to be matched at this level.
    #[inline]
    pub fn peek_next_order(&self) -> Option<OrderId> {
        self.orders.front().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    fn summary(&self) -> LevelSummary {
        LevelSummary {
            price: self.price,
            total_size: self.total_size,
            order_count: self.order_count(),
        }
    }
}

/// The resting order book. Uses BTreeMap for price level organization and VecDeque
/// for FIFO ordering within price levels.
///
/// The book owns its orders exclusively; read operations hand out copies or shared
/// references, and mutation goes through `insert`, `remove`, `fill` and `amend`.
#[derive(Debug, Default)]
pub struct OrderBook {
    /// Buy side price levels (best is the highest key)
    buys: BTreeMap<Price, PriceLevel>,
    /// Sell side price levels (best is the lowest key)
    sells: BTreeMap<Price, PriceLevel>,
    /// Resting orders by id
    orders: HashMap<OrderId, Order>,
    /// Total resting size per side. Bounds every level total and query sum.
    buy_volume: Size,
    sell_volume: Size,
    /// Next arrival stamp handed to an inserted order
    next_sequence: u64,
}

impl OrderBook {
    /// Creates a new empty order book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty book with room for `capacity` orders in the id index.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            orders: HashMap::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Number of resting orders.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn contains(&self, order_id: OrderId) -> bool {
        self.orders.contains_key(&order_id)
    }

    /// Gets a resting order by its id.
    pub fn get(&self, order_id: OrderId) -> Option<&Order> {
        self.orders.get(&order_id)
    }

    /// Total resting size on one side.
    pub fn volume(&self, side: Side) -> Size {
        match side {
            Side::Buy => self.buy_volume,
            Side::Sell => self.sell_volume,
        }
    }

    /// Checks that `size` more can rest on `side` without leaving the `Size` range.
    pub fn check_volume(&self, side: Side, size: Size) -> Result<(), OrderbookError> {
        self.check_volume_after_release(side, size, 0)
    }

    /// Same as `check_volume`, with `released` already taken off the side first.
    fn check_volume_after_release(&self, side: Side, size: Size, released: Size) -> Result<(), OrderbookError> {
        (self.volume(side) - released)
            .checked_add(size)
            .map(|_| ())
            .ok_or(OrderbookError::VolumeOverflow { side, size })
    }

    /// Adds an order at the back of its price level, replacing any entry with the same id.
    ///
    /// Price and size are not validated here; the matching engine checks them before
    /// anything reaches the book. Fails without mutating when the side volume would overflow.
    pub fn insert(&mut self, mut order: Order) -> Result<(), OrderbookError> {
        let released = match self.orders.get(&order.id) {
            Some(existing) if existing.side == order.side => existing.size,
            _ => 0,
        };
        self.check_volume_after_release(order.side, order.size, released)?;

        if self.contains(order.id) {
            self.remove(order.id)?;
        }

        self.next_sequence += 1;
        order.sequence = self.next_sequence;

        let level = self
            .levels_mut(order.side)
            .entry(order.price)
            .or_insert_with(|| PriceLevel::new(order.price));
        level.orders.push_back(order.id);
        level.total_size += order.size;
        *self.volume_mut(order.side) += order.size;

        trace!(order_id = order.id, side = %order.side, price = order.price, size = order.size, "order inserted");
        self.orders.insert(order.id, order);
        Ok(())
    }

    /// Removes an order from the book.
    ///
    /// # Returns
    /// * `Ok(Order)` - The removed order
    /// * `Err(OrderbookError::OrderNotFound)` - If the id is not resting
    pub fn remove(&mut self, order_id: OrderId) -> Result<Order, OrderbookError> {
        let order = self
            .orders
            .remove(&order_id)
            .ok_or(OrderbookError::OrderNotFound(order_id))?;

        *self.volume_mut(order.side) -= order.size;
        let levels = self.levels_mut(order.side);
        if let Some(level) = levels.get_mut(&order.price) {
            if let Some(pos) = level.orders.iter().position(|id| *id == order_id) {
                level.orders.remove(pos);
            }
            level.total_size -= order.size;

            if level.is_empty() {
                levels.remove(&order.price);
            }
        }

        trace!(order_id, "order removed");
        Ok(order)
    }

    /// Sums the resting size an incoming order on `side` at `price` could trade against.
    ///
    /// For a buy this is every sell priced at or below `price`; for a sell every buy
    /// priced at or above it. Returns 0 when nothing crosses. The sum never exceeds
    /// the opposite side's volume, so it cannot overflow.
    pub fn total_size_at_price(&self, price: Price, side: Side) -> Result<Size, OrderbookError> {
        if price < 0 {
            return Err(OrderbookError::InvalidPrice(price));
        }

        let total = match side {
            Side::Buy => self.sells.range(..=price).map(|(_, level)| level.total_size).sum(),
            Side::Sell => self.buys.range(price..).map(|(_, level)| level.total_size).sum(),
        };
        Ok(total)
    }

    /// The resting buy with the highest price, earliest arrival first among equals.
    pub fn best_buy(&self) -> Result<Order, OrderbookError> {
        self.peek_best_order(Side::Buy)
            .cloned()
            .ok_or(OrderbookError::NoRestingOrders(Side::Buy))
    }

    /// The resting sell with the lowest price, earliest arrival first among equals.
    pub fn best_sell(&self) -> Result<Order, OrderbookError> {
        self.peek_best_order(Side::Sell)
            .cloned()
            .ok_or(OrderbookError::NoRestingOrders(Side::Sell))
    }

    /// Gets the next order to be matched on `side` without copying it.
    #[inline]
    pub fn peek_best_order(&self, side: Side) -> Option<&Order> {
        let level = match side {
            Side::Buy => self.buys.values().next_back(),
            Side::Sell => self.sells.values().next(),
        }?;
        level.peek_next_order().and_then(|id| self.orders.get(&id))
    }

    /// Best price on a side, if any order rests there.
    pub fn best_price(&self, side: Side) -> Option<Price> {
        match side {
            Side::Buy => self.buys.keys().next_back().copied(),
            Side::Sell => self.sells.keys().next().copied(),
        }
    }

    /// Difference between the best sell and the best buy. Negative when the book is crossed.
    pub fn spread(&self) -> Option<Price> {
        match (self.best_price(Side::Sell), self.best_price(Side::Buy)) {
            (Some(sell), Some(buy)) => Some(sell - buy),
            _ => None,
        }
    }

    /// Takes `size` off a resting order, removing it in the same step when it reaches zero.
    ///
    /// Returns a copy of the order after the fill (size zero if it was removed).
    pub fn fill(&mut self, order_id: OrderId, size: Size) -> Result<Order, OrderbookError> {
        if size <= 0 {
            return Err(OrderbookError::InvalidSize(size));
        }

        let order = self
            .orders
            .get_mut(&order_id)
            .ok_or(OrderbookError::OrderNotFound(order_id))?;
        if size > order.size {
            return Err(OrderbookError::Overfill {
                id: order_id,
                requested: size,
                available: order.size,
            });
        }

        order.size -= size;
        let filled = order.clone();

        if let Some(level) = self.levels_mut(filled.side).get_mut(&filled.price) {
            level.total_size -= size;
        }
        *self.volume_mut(filled.side) -= size;

        if filled.size == 0 {
            self.remove(order_id)?;
        }
        Ok(filled)
    }

    /// Replaces the price and size of a resting order.
    ///
    /// A pure size reduction at the same price keeps the order's place in the queue;
    /// any other change sends it to the back of its (new) price level.
    pub fn amend(&mut self, order_id: OrderId, price: Price, size: Size) -> Result<Order, OrderbookError> {
        let order = self
            .orders
            .get_mut(&order_id)
            .ok_or(OrderbookError::OrderNotFound(order_id))?;

        if order.price == price && size <= order.size {
            let delta = order.size - size;
            order.size = size;
            let amended = order.clone();
            if let Some(level) = self.levels_mut(amended.side).get_mut(&price) {
                level.total_size -= delta;
            }
            *self.volume_mut(amended.side) -= delta;
            return Ok(amended);
        }

        let (side, released) = (order.side, order.size);
        self.check_volume_after_release(side, size, released)?;

        let mut order = self.remove(order_id)?;
        order.price = price;
        order.size = size;
        self.insert(order)?;
        self.get(order_id)
            .cloned()
            .ok_or(OrderbookError::OrderNotFound(order_id))
    }

    /// Aggregated levels on one side, best price first.
    pub fn depth(&self, side: Side, levels: usize) -> Vec<LevelSummary> {
        match side {
            Side::Buy => self.buys.values().rev().take(levels).map(PriceLevel::summary).collect(),
            Side::Sell => self.sells.values().take(levels).map(PriceLevel::summary).collect(),
        }
    }

    /// Copies of every resting order: buys best first, then sells best first,
    /// arrival order within a level.
    pub fn resting_orders(&self) -> Vec<Order> {
        self.buys
            .values()
            .rev()
            .chain(self.sells.values())
            .flat_map(|level| level.orders.iter())
            .filter_map(|id| self.orders.get(id).cloned())
            .collect()
    }

    fn volume_mut(&mut self, side: Side) -> &mut Size {
        match side {
            Side::Buy => &mut self.buy_volume,
            Side::Sell => &mut self.sell_volume,
        }
    }

    fn levels_mut(&mut self, side: Side) -> &mut BTreeMap<Price, PriceLevel> {
        match side {
            Side::Buy => &mut self.buys,
            Side::Sell => &mut self.sells,
        }
    }
}

impl fmt::Display for OrderBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for order in self.resting_orders() {
            writeln!(f, "{order}")?;
        }
        Ok(())
    }
}
