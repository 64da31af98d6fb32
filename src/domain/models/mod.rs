pub mod orderbook;
pub mod types;
