use crate::domain::models::types::{Price, Side};
use crate::domain::services::matching_engine::BookQuery;
use crate::inbounds::dtos::Response;

use super::rejected;

/// +----------------------------------------------------------+
/// | STRUCTS | TRAITS | ENUMS | FUNCTIONS                     |
/// +----------+-------+-------+------------------------------+
/// | Functions:                                               |
/// |   - handle_total_size                                    |
/// |   - handle_best                                          |
/// |   - handle_depth                                         |
/// |   - handle_book                                          |
/// +----------------------------------------------------------+

pub fn handle_total_size<E>(engine: &E, price: Price, side: Side) -> Response
where
    E: BookQuery + ?Sized,
{
    match engine.total_size_at_price(price, side) {
        Ok(size) => Response::TotalSize { price, side, size },
        Err(e) => rejected(e),
    }
}

/// Best buy is the highest priced buy, best sell the lowest priced sell.
pub fn handle_best<E>(engine: &E, side: Side) -> Response
where
    E: BookQuery + ?Sized,
{
    let best = match side {
        Side::Buy => engine.highest_buy_price(),
        Side::Sell => engine.lowest_sell_price(),
    };
    match best {
        Ok(order) => Response::Best { order },
        Err(e) => rejected(e),
    }
}

pub fn handle_depth<E>(engine: &E, side: Side, levels: usize) -> Response
where
    E: BookQuery + ?Sized,
{
    Response::Depth {
        side,
        levels: engine.depth(side, levels),
    }
}

pub fn handle_book<E>(engine: &E) -> Response
where
    E: BookQuery + ?Sized,
{
    Response::Book {
        orders: engine.resting_orders(),
    }
}
