//! TradeSim Runner — run orchestration on top of `tradesim-core`.
//!
//! This crate provides:
//! - TOML run configuration with content-addressed run ids
//! - Signal/price input loading from CSV, plus seeded synthetic inputs
//! - Single-run orchestration (simulate → analyze → result)
//! - Parallel parameter sweeps across independent runs
//! - JSON/CSV artifact export

pub mod config;
pub mod data_loader;
pub mod export;
pub mod runner;
pub mod sweep;

pub use config::{ConfigError, RunConfig, RunId};
pub use data_loader::{load_input_csv, read_input_csv, synthetic_input, BacktestInput, LoadError};
pub use export::{
    export_equity_csv, export_json, export_trades_csv, import_json, load_artifacts,
    save_artifacts,
};
pub use runner::{run_backtest, run_from_config, BacktestResult, RunError, SCHEMA_VERSION};
pub use sweep::{ParamGrid, ParamSweep, SweepResults};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn backtest_result_is_send_sync() {
        assert_send::<BacktestResult>();
        assert_sync::<BacktestResult>();
    }

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<RunConfig>();
        assert_sync::<RunConfig>();
        assert_send::<ParamGrid>();
        assert_sync::<ParamGrid>();
    }

    #[test]
    fn input_is_send_sync() {
        assert_send::<BacktestInput>();
        assert_sync::<BacktestInput>();
    }

    #[test]
    fn errors_are_send_sync() {
        assert_send::<RunError>();
        assert_sync::<RunError>();
    }
}
