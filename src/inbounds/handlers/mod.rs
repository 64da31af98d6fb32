/// +----------------------------------------------------------+
/// | MODULES                                                  |
/// +----------+-------+-------+------------------------------+
/// | Exports:                                                 |
/// |   - order_handler                                        |
/// |   - query_handler                                        |
/// |   - script_handler                                       |
/// |   - handle_command                                       |
/// +----------------------------------------------------------+
use tracing::error;

use crate::domain::services::matching_engine::{BookQuery, ErrorKind, MatchingError, OrderEntry};

use super::dtos::{Command, Response};

/// Handler for send, modify and cancel
pub mod order_handler;

/// Handler for size, best, depth and book queries
pub mod query_handler;

/// Handler for line-oriented command scripts
pub mod script_handler;

/// Routes a command to the matching handler.
pub fn handle_command<E>(engine: &mut E, command: Command) -> Response
where
    E: OrderEntry + BookQuery + ?Sized,
{
    match command {
        Command::Send { id, side, price, size } => order_handler::handle_send(engine, id, side, price, size),
        Command::Modify { id, price, size } => order_handler::handle_modify(engine, id, price, size),
        Command::Cancel { id } => order_handler::handle_cancel(engine, id),
        Command::Size { price, side } => query_handler::handle_total_size(engine, price, side),
        Command::Best { side } => query_handler::handle_best(engine, side),
        Command::Depth { side, levels } => query_handler::handle_depth(engine, side, levels),
        Command::Book => query_handler::handle_book(engine),
    }
}

/// Turns an engine failure into a response the caller can keep going after.
pub(crate) fn rejected(err: MatchingError) -> Response {
    if err.kind() == ErrorKind::Corrupt {
        error!("engine reported corrupt state: {err}");
    }
    Response::Rejected {
        kind: err.kind(),
        reason: err.to_string(),
    }
}
