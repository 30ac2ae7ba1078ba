//! Performance analyzer — pure functions over a capital trajectory and trade ledger.
//!
//! Every metric is a pure function: trajectory and/or trades in, scalar out.
//! Formatting (percentages, currency) belongs to the caller.

use serde::{Deserialize, Serialize};

use crate::domain::Trade;
use crate::engine::simulator::validate_capital;
use crate::error::BacktestError;

/// Summary statistics for one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// `(final - initial) / initial`.
    pub total_return: f64,
    /// Worst decline from a running peak, as a fraction ≤ 0.
    pub max_drawdown: f64,
    /// Fraction of trades with strictly positive profit; 0 with no trades.
    pub win_rate: f64,
    pub trade_count: usize,
    pub winning_trades: usize,
}

impl PerformanceSummary {
    /// Compute the summary from a simulator's outputs.
    pub fn compute(
        trajectory: &[f64],
        trades: &[Trade],
        initial_capital: f64,
    ) -> Result<Self, BacktestError> {
        let final_capital = *trajectory.last().ok_or(BacktestError::EmptyHistory)?;
        validate_capital(initial_capital)?;

        Ok(Self {
            total_return: total_return(final_capital, initial_capital),
            max_drawdown: max_drawdown(trajectory),
            win_rate: win_rate(trades),
            trade_count: trades.len(),
            winning_trades: winning_trades(trades),
        })
    }
}

/// Analyze a finished run. Fails with `EmptyHistory` on an empty trajectory.
pub fn analyze(
    trajectory: &[f64],
    trades: &[Trade],
    initial_capital: f64,
) -> Result<PerformanceSummary, BacktestError> {
    PerformanceSummary::compute(trajectory, trades, initial_capital)
}

// ─── Individual metric functions ────────────────────────────────────

/// Total return as a fraction: (final - initial) / initial.
pub fn total_return(final_capital: f64, initial_capital: f64) -> f64 {
    (final_capital - initial_capital) / initial_capital
}

/// Maximum drawdown as a non-positive fraction (e.g. -0.15 = 15% drawdown).
///
/// Single forward scan carrying the running peak. Returns 0.0 for an empty,
/// constant or non-decreasing trajectory.
pub fn max_drawdown(trajectory: &[f64]) -> f64 {
    let Some(&first) = trajectory.first() else {
        return 0.0;
    };
    let mut peak = first;
    let mut max_dd = 0.0_f64;

    for &value in trajectory {
        if value > peak {
            peak = value;
        }
        if peak > 0.0 {
            let dd = (value - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Win rate: fraction of trades that were winners. Zero trades → 0.0.
pub fn win_rate(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    winning_trades(trades) as f64 / trades.len() as f64
}

pub fn winning_trades(trades: &[Trade]) -> usize {
    trades.iter().filter(|t| t.is_winner()).count()
}
