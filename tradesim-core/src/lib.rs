//! TradeSim Core — signal/position domain types, trade simulator, performance analyzer.
//!
//! This crate contains the backtest engine proper:
//! - Domain types (signals, position state, trades)
//! - Single-pass trade simulator over aligned signal/price sequences
//! - Performance analyzer (total return, max drawdown, win rate)
//! - The shared error taxonomy
//!
//! Everything here is synchronous and free of I/O. Loading inputs, sweeping
//! many runs in parallel and exporting artifacts live in `tradesim-runner`.

pub mod domain;
pub mod engine;
pub mod error;
pub mod metrics;

pub use domain::{PositionState, Signal, Trade};
pub use engine::{simulate, RedundantSignalPolicy, SimState, SimulationOutput, Simulator};
pub use error::BacktestError;
pub use metrics::{analyze, PerformanceSummary};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything a sweep worker hands across threads is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Signal>();
        require_sync::<Signal>();
        require_send::<PositionState>();
        require_sync::<PositionState>();
        require_send::<Trade>();
        require_sync::<Trade>();

        require_send::<Simulator>();
        require_sync::<Simulator>();
        require_send::<SimState>();
        require_sync::<SimState>();
        require_send::<SimulationOutput>();
        require_sync::<SimulationOutput>();

        require_send::<PerformanceSummary>();
        require_sync::<PerformanceSummary>();
        require_send::<BacktestError>();
        require_sync::<BacktestError>();
    }

    /// Architecture contract: the analyzer only sees simulator outputs.
    ///
    /// `analyze()` takes the trajectory and ledger by shared reference and
    /// returns a fresh summary, so it cannot mutate a run.
    #[test]
    fn analyzer_takes_outputs_by_reference() {
        fn _check_signature(
            out: &SimulationOutput,
            initial_capital: f64,
        ) -> Result<PerformanceSummary, BacktestError> {
            analyze(&out.trajectory, &out.trades, initial_capital)
        }
    }
}
