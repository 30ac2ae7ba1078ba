//! Domain types for TradeSim

pub mod position;
pub mod signal;
pub mod trade;

pub use position::PositionState;
pub use signal::Signal;
pub use trade::Trade;
