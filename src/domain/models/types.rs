//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module defines the core value types used throughout the exchange: the order side,
// the resting order itself and the fill produced by a single crossing step.
//
// | Section            | Description                                                      |
// |--------------------|------------------------------------------------------------------|
// | ALIASES            | Integer identity, price and size types.                          |
// | ENUMS              | Side of an order (Buy/Sell).                                     |
// | STRUCTS            | Order and Fill.                                                  |
// | Potential Errors   | Errors raised while converting raw values into these types.      |
// | TESTS              | Unit tests for the defined types.                                |
//--------------------------------------------------------------------------------------------------

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

//--------------------------------------------------------------------------------------------------
//  ALIASES
//--------------------------------------------------------------------------------------------------

/// Caller-assigned order identity, unique among resting orders.
pub type OrderId = u64;

/// Integer price. Signed so that non-positive input can be represented and rejected.
pub type Price = i64;

/// Integer size. Signed for the same reason as [`Price`].
pub type Size = i64;

//--------------------------------------------------------------------------------------------------
//  ENUMS
//--------------------------------------------------------------------------------------------------
// | Name          | Description                                 |
// |---------------|---------------------------------------------|
// | Side          | Represents the side of an order (Buy/Sell). |
//--------------------------------------------------------------------------------------------------

/// Represents the side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// A buy order.
    Buy,
    /// A sell order.
    Sell,
}

impl Side {
    /// Maps the `is_buy` flag of the intake contract onto a side.
    pub fn from_is_buy(is_buy: bool) -> Self {
        if is_buy { Self::Buy } else { Self::Sell }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }

    /// Returns true when an order on this side at `price` would trade against a
    /// resting order on the opposite side at `resting_price`.
    #[inline]
    pub fn crosses(&self, price: Price, resting_price: Price) -> bool {
        match self {
            Self::Buy => price >= resting_price,
            Self::Sell => price <= resting_price,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => f.write_str("BUY"),
            Self::Sell => f.write_str("SELL"),
        }
    }
}

impl FromStr for Side {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "buy" | "b" => Ok(Self::Buy),
            "sell" | "s" => Ok(Self::Sell),
            _ => Err(TypeError::InvalidSide(s.to_string())),
        }
    }
}

//--------------------------------------------------------------------------------------------------
//  STRUCTS
//--------------------------------------------------------------------------------------------------
// | Name          | Description                                          |
// |---------------|------------------------------------------------------|
// | Order         | A buy or sell order, resting or being matched.       |
// | Fill          | Size exchanged between two orders in one step.       |
//--------------------------------------------------------------------------------------------------

/// Represents an order. Only the matching engine mutates price and size; callers
/// receive copies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Caller-assigned identifier.
    pub id: OrderId,
    /// Side of the order (Buy or Sell).
    pub side: Side,
    /// Limit price, always positive once accepted.
    pub price: Price,
    /// Remaining size, always positive while resting.
    pub size: Size,
    /// Arrival stamp assigned by the book when the order rests (time priority).
    #[serde(default)]
    pub sequence: u64,
}

impl Order {
    pub fn new(id: OrderId, side: Side, price: Price, size: Size) -> Self {
        Self { id, side, price, size, sequence: 0 }
    }
}

/// Orders compare by side, price and size. Identity and arrival stamp are ignored.
impl PartialEq for Order {
    fn eq(&self, other: &Self) -> bool {
        self.side == other.side && self.price == other.price && self.size == other.size
    }
}

impl Eq for Order {}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order#{}: {{side: {}, price: {}, size: {}}}",
            self.id, self.side, self.price, self.size
        )
    }
}

/// Size exchanged between an incoming order and a resting one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    /// ID of the order that was resting on the book.
    pub maker_id: OrderId,
    /// ID of the incoming order.
    pub taker_id: OrderId,
    /// Price of the resting order.
    pub price: Price,
    /// Size taken off both orders.
    pub size: Size,
}

//--------------------------------------------------------------------------------------------------
//  Potential Errors
//--------------------------------------------------------------------------------------------------

/// Errors raised while converting raw values into model types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// Occurs when a side cannot be parsed from text.
    #[error("Invalid side specified: {0}")]
    InvalidSide(String),
}

//--------------------------------------------------------------------------------------------------
//  TESTS
//--------------------------------------------------------------------------------------------------
// | Name                         | Description                                      |
// |------------------------------|--------------------------------------------------|
// | test_order_equality          | Equality ignores id and sequence.                |
// | test_order_display           | Display format of an order.                      |
// | test_side_helpers            | opposite, from_is_buy, crosses.                  |
// | test_side_parsing            | FromStr and Display round trip on known tokens.  |
// | test_side_serde              | Sides serialize as uppercase strings.            |
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_equality() {
        let a = Order::new(1, Side::Buy, 12, 6);
        let mut b = Order::new(99, Side::Buy, 12, 6);
        b.sequence = 42;
        assert_eq!(a, b);

        assert_ne!(a, Order::new(1, Side::Sell, 12, 6));
        assert_ne!(a, Order::new(1, Side::Buy, 11, 6));
        assert_ne!(a, Order::new(1, Side::Buy, 12, 5));
    }

    #[test]
    fn test_order_display() {
        let order = Order::new(7, Side::Sell, 10, 5);
        assert_eq!(order.to_string(), "Order#7: {side: SELL, price: 10, size: 5}");
    }

    #[test]
    fn test_side_helpers() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
        assert_eq!(Side::from_is_buy(true), Side::Buy);
        assert_eq!(Side::from_is_buy(false), Side::Sell);

        // Buy at 10 crosses sells at 10 and below
        assert!(Side::Buy.crosses(10, 10));
        assert!(Side::Buy.crosses(10, 9));
        assert!(!Side::Buy.crosses(10, 11));

        // Sell at 10 crosses buys at 10 and above
        assert!(Side::Sell.crosses(10, 10));
        assert!(Side::Sell.crosses(10, 11));
        assert!(!Side::Sell.crosses(10, 9));
    }

    #[test]
    fn test_side_parsing() {
        assert_eq!("buy".parse::<Side>(), Ok(Side::Buy));
        assert_eq!("SELL".parse::<Side>(), Ok(Side::Sell));
        assert_eq!("b".parse::<Side>(), Ok(Side::Buy));
        assert_eq!(
            "hold".parse::<Side>(),
            Err(TypeError::InvalidSide("hold".to_string()))
        );
        assert_eq!(Side::Buy.to_string(), "BUY");
    }

    #[test]
    fn test_side_serde() {
        let json = serde_json::to_string(&Side::Sell).unwrap();
        assert_eq!(json, "\"SELL\"");
        let side: Side = serde_json::from_str("\"BUY\"").unwrap();
        assert_eq!(side, Side::Buy);
    }
}
