use std::fmt;
use std::str::{FromStr, SplitWhitespace};

use serde::{Deserialize, Serialize};

use crate::domain::models::orderbook::{LevelSummary, SendOutcome};
use crate::domain::models::types::{Order, OrderId, Price, Side, Size};
use crate::domain::services::matching_engine::ErrorKind;

use super::api_error::CommandError;

/// +----------------------------------------------------------+
/// | STRUCTS | TRAITS | ENUMS | FUNCTIONS                     |
/// +----------+-------+-------+------------------------------+
/// | Enums:                                                   |
/// |   - Command                                              |
/// |   - Response                                             |
/// | Functions:                                               |
/// |   - Command::parse_line                                  |
/// +----------------------------------------------------------+

/// Number of levels returned by `depth` when none is given.
pub const DEFAULT_DEPTH_LEVELS: usize = 5;

fn default_depth_levels() -> usize {
    DEFAULT_DEPTH_LEVELS
}

/// A request against the exchange, either parsed from a text line
/// (`send 1 buy 10 5`) or deserialized from a JSON object
/// (`{"type":"send","id":1,"side":"BUY","price":10,"size":5}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    Send {
        id: OrderId,
        side: Side,
        price: Price,
        size: Size,
    },
    Modify {
        id: OrderId,
        price: Price,
        size: Size,
    },
    Cancel {
        id: OrderId,
    },
    /// Total crossing size for an order on `side` at `price`.
    Size {
        price: Price,
        side: Side,
    },
    /// Best resting order on `side`.
    Best {
        side: Side,
    },
    Depth {
        side: Side,
        #[serde(default = "default_depth_levels")]
        levels: usize,
    },
    /// Every resting order.
    Book,
}

impl Command {
    /// Parses one script line. Blank lines and `#` comments yield `None`.
    pub fn parse_line(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        if line.starts_with('{') {
            return serde_json::from_str(line)
                .map(Some)
                .map_err(|e| CommandError::Json(e.to_string()));
        }
        line.parse().map(Some)
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let name = tokens.next().unwrap_or_default().to_ascii_lowercase();

        let command = match name.as_str() {
            "send" => Command::Send {
                id: required(&mut tokens, "send", "id")?,
                side: required(&mut tokens, "send", "side")?,
                price: required(&mut tokens, "send", "price")?,
                size: required(&mut tokens, "send", "size")?,
            },
            "modify" => Command::Modify {
                id: required(&mut tokens, "modify", "id")?,
                price: required(&mut tokens, "modify", "price")?,
                size: required(&mut tokens, "modify", "size")?,
            },
            "cancel" => Command::Cancel {
                id: required(&mut tokens, "cancel", "id")?,
            },
            "size" => Command::Size {
                price: required(&mut tokens, "size", "price")?,
                side: required(&mut tokens, "size", "side")?,
            },
            "best" => Command::Best {
                side: required(&mut tokens, "best", "side")?,
            },
            "depth" => Command::Depth {
                side: required(&mut tokens, "depth", "side")?,
                levels: optional(&mut tokens, "levels")?.unwrap_or(DEFAULT_DEPTH_LEVELS),
            },
            "book" => Command::Book,
            _ => return Err(CommandError::UnknownCommand(name)),
        };

        match tokens.next() {
            Some(extra) => Err(CommandError::UnexpectedArgument {
                command: command.name(),
                value: extra.to_string(),
            }),
            None => Ok(command),
        }
    }
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Send { .. } => "send",
            Command::Modify { .. } => "modify",
            Command::Cancel { .. } => "cancel",
            Command::Size { .. } => "size",
            Command::Best { .. } => "best",
            Command::Depth { .. } => "depth",
            Command::Book => "book",
        }
    }
}

/// Values that can appear as a command argument.
trait Argument: Sized {
    fn parse_arg(argument: &'static str, raw: &str) -> Result<Self, CommandError>;
}

macro_rules! numeric_argument {
    ($($t:ty),*) => {
        $(impl Argument for $t {
            fn parse_arg(argument: &'static str, raw: &str) -> Result<Self, CommandError> {
                raw.parse().map_err(|_| CommandError::InvalidArgument {
                    argument,
                    value: raw.to_string(),
                })
            }
        })*
    };
}

numeric_argument!(i64, u64, usize);

impl Argument for Side {
    fn parse_arg(_argument: &'static str, raw: &str) -> Result<Self, CommandError> {
        Ok(raw.parse()?)
    }
}

fn required<T: Argument>(
    tokens: &mut SplitWhitespace<'_>,
    command: &'static str,
    argument: &'static str,
) -> Result<T, CommandError> {
    let raw = tokens
        .next()
        .ok_or(CommandError::MissingArgument { command, argument })?;
    T::parse_arg(argument, raw)
}

fn optional<T: Argument>(
    tokens: &mut SplitWhitespace<'_>,
    argument: &'static str,
) -> Result<Option<T>, CommandError> {
    tokens.next().map(|raw| T::parse_arg(argument, raw)).transpose()
}

/// The answer to one command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Response {
    Sent(SendOutcome),
    Modified { order: Order },
    Cancelled { order: Order },
    TotalSize { price: Price, side: Side, size: Size },
    Best { order: Order },
    Depth { side: Side, levels: Vec<LevelSummary> },
    Book { orders: Vec<Order> },
    /// The engine refused the command; the script carries on.
    Rejected { kind: ErrorKind, reason: String },
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Sent(outcome) => {
                write!(f, "sent #{}: filled {}", outcome.order_id, outcome.filled_size())?;
                match &outcome.resting {
                    Some(order) => write!(f, ", resting {order}")?,
                    None => write!(f, ", nothing resting")?,
                }
                for fill in &outcome.fills {
                    write!(f, "\n  fill #{} x #{}: {} @ {}", fill.taker_id, fill.maker_id, fill.size, fill.price)?;
                }
                Ok(())
            }
            Response::Modified { order } => write!(f, "modified {order}"),
            Response::Cancelled { order } => write!(f, "cancelled {order}"),
            Response::TotalSize { price, side, size } => {
                write!(f, "total size crossing {side} @ {price}: {size}")
            }
            Response::Best { order } => write!(f, "best {}: {order}", order.side),
            Response::Depth { side, levels } => {
                write!(f, "depth {side}:")?;
                if levels.is_empty() {
                    write!(f, " (empty)")?;
                }
                for level in levels {
                    write!(f, "\n  {} x {} ({} orders)", level.price, level.total_size, level.order_count)?;
                }
                Ok(())
            }
            Response::Book { orders } => {
                write!(f, "book: {} resting", orders.len())?;
                for order in orders {
                    write!(f, "\n  {order}")?;
                }
                Ok(())
            }
            Response::Rejected { kind, reason } => write!(f, "rejected ({kind:?}): {reason}"),
        }
    }
}
