use serde::{Deserialize, Serialize};

use super::types::{Fill, Order, OrderId, Price, Size};

/// Outcome of one pairing attempt between the incoming order and the best opposing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossStep {
    /// Size was exchanged with a resting order.
    Matched(Fill),
    /// Nothing on the opposite side crosses the incoming price.
    NoMatch,
}

/// Result of sending an order into the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendOutcome {
    pub order_id: OrderId,
    /// Crossing steps in execution order.
    pub fills: Vec<Fill>,
    /// Copy of the remainder left resting, if any.
    pub resting: Option<Order>,
}

impl SendOutcome {
    pub fn filled_size(&self) -> Size {
        self.fills.iter().map(|fill| fill.size).sum()
    }

    pub fn is_fully_filled(&self) -> bool {
        self.resting.is_none()
    }
}

/// Aggregated view of one price level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSummary {
    pub price: Price,
    pub total_size: Size,
    pub order_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::types::Side;

    #[test]
    fn test_send_outcome_totals() {
        let outcome = SendOutcome {
            order_id: 5,
            fills: vec![
                Fill { maker_id: 2, taker_id: 5, price: 12, size: 3 },
                Fill { maker_id: 1, taker_id: 5, price: 10, size: 1 },
            ],
            resting: Some(Order::new(5, Side::Sell, 9, 2)),
        };
        assert_eq!(outcome.filled_size(), 4);
        assert!(!outcome.is_fully_filled());

        let filled = SendOutcome { resting: None, ..outcome };
        assert!(filled.is_fully_filled());
    }
}
