use tracing::info;

use crate::domain::models::types::{OrderId, Price, Side, Size};
use crate::domain::services::matching_engine::OrderEntry;
use crate::inbounds::dtos::Response;

use super::rejected;

/// +----------------------------------------------------------+
/// | STRUCTS | TRAITS | ENUMS | FUNCTIONS                     |
/// +----------+-------+-------+------------------------------+
/// | Functions:                                               |
/// |   - handle_send                                          |
/// |   - handle_modify                                        |
/// |   - handle_cancel                                        |
/// +----------------------------------------------------------+

/// Sends a new order into the engine.
///
/// # Flow
///
/// 1. Logs the order
/// 2. Forwards it to the engine
/// 3. Returns the fills and resting remainder, or the rejection
pub fn handle_send<E>(engine: &mut E, id: OrderId, side: Side, price: Price, size: Size) -> Response
where
    E: OrderEntry + ?Sized,
{
    info!(order_id = id, %side, price, size, "sending order");
    match engine.send(id, side, price, size) {
        Ok(outcome) => Response::Sent(outcome),
        Err(e) => rejected(e),
    }
}

/// Replaces price and size of a resting order.
pub fn handle_modify<E>(engine: &mut E, id: OrderId, price: Price, size: Size) -> Response
where
    E: OrderEntry + ?Sized,
{
    info!(order_id = id, price, size, "modifying order");
    match engine.modify(id, price, size) {
        Ok(order) => Response::Modified { order },
        Err(e) => rejected(e),
    }
}

/// Cancels a resting order.
pub fn handle_cancel<E>(engine: &mut E, id: OrderId) -> Response
where
    E: OrderEntry + ?Sized,
{
    info!(order_id = id, "cancelling order");
    match engine.cancel(id) {
        Ok(order) => Response::Cancelled { order },
        Err(e) => rejected(e),
    }
}
