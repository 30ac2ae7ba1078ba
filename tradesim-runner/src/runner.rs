//! Backtest runner — wires together config, simulator and analyzer.
//!
//! Two entry points:
//! - `run_backtest()`: takes a config and a pre-loaded input. Used by sweeps and tests.
//! - `run_from_config()`: resolves the input named in the config, then runs. Used by the CLI.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use tradesim_core::{analyze, BacktestError, PerformanceSummary, PositionState, Trade};

use crate::config::{ConfigError, RunConfig, RunId};
use crate::data_loader::{load_input_csv, BacktestInput, LoadError};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("input error: {0}")]
    Load(#[from] LoadError),
    #[error("backtest error: {0}")]
    Backtest(#[from] BacktestError),
    #[error("config has no [input] section")]
    NoInput,
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result of a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub run_id: RunId,
    pub label: String,
    pub config: RunConfig,
    pub summary: PerformanceSummary,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<f64>,
    pub initial_capital: f64,
    pub final_capital: f64,
    /// Position left open at the last step (its gain or loss is unrealized).
    pub open_position: PositionState,
    pub step_count: usize,
    pub has_synthetic: bool,
}

/// Default schema version for serde deserialization of older JSON without the field.
fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Run a single backtest on pre-loaded input — no I/O.
///
/// The run is all-or-nothing: any simulator or analyzer error is returned
/// and no partial result is produced. A zero-length input simulates fine but
/// cannot be analyzed, so it fails with `EmptyHistory`.
pub fn run_backtest(config: &RunConfig, input: &BacktestInput) -> Result<BacktestResult, RunError> {
    let simulator = config.simulator()?;
    let output = simulator.simulate(&input.signals, &input.prices)?;
    let summary = analyze(&output.trajectory, &output.trades, config.initial_capital())?;
    let run_id = config.run_id(&input.signals, &input.prices);

    info!(
        run_id = %run_id,
        label = %input.label,
        steps = output.step_count(),
        trades = summary.trade_count,
        final_capital = output.final_capital,
        "backtest complete"
    );

    Ok(BacktestResult {
        schema_version: SCHEMA_VERSION,
        run_id,
        label: input.label.clone(),
        config: config.clone(),
        summary,
        step_count: output.step_count(),
        initial_capital: config.initial_capital(),
        final_capital: output.final_capital,
        open_position: output.open_position,
        trades: output.trades,
        equity_curve: output.trajectory,
        has_synthetic: input.synthetic,
    })
}

/// Load the CSV named in `[input]` and run it.
pub fn run_from_config(config: &RunConfig) -> Result<BacktestResult, RunError> {
    let input_cfg = config.input.as_ref().ok_or(RunError::NoInput)?;
    let input = load_input_csv(&input_cfg.path)?;
    run_backtest(config, &input)
}
