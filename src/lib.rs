// Expose the modules
pub mod config;
pub mod domain;
pub mod inbounds;

// Re-export key types for easier usage
pub use config::{Config, ConfigError, OutputFormat};
pub use domain::models::orderbook::{CrossStep, LevelSummary, SendOutcome};
pub use domain::models::types::{Fill, Order, OrderId, Price, Side, Size, TypeError};
pub use domain::services::matching_engine::{
    BookQuery, ErrorKind, MatchingEngine, MatchingError, MatchingResult, OrderEntry,
};
pub use domain::services::orderbook::{OrderBook, OrderbookError, PriceLevel};
pub use inbounds::api_error::{CommandError, ScriptError};
pub use inbounds::dtos::{Command, Response};
pub use inbounds::handlers::{handle_command, script_handler::run_script};
