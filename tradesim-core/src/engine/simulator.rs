//! Simulator entry points: input validation, the step loop, run output.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::domain::{PositionState, Signal, Trade};
use crate::error::BacktestError;

use super::state::{SimState, StepOutcome};

/// How Buy-while-Long and Sell-while-Flat are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedundantSignalPolicy {
    /// Silently ignore the signal (one open position at a time).
    #[default]
    Ignore,
    /// Fail the whole run with `BacktestError::RedundantSignal`.
    Reject,
}

/// Result of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutput {
    /// Capital at the end of every step; same length as the inputs.
    pub trajectory: Vec<f64>,
    /// Completed round trips, in exit order.
    pub trades: Vec<Trade>,
    /// Realized capital. An open position's mark-to-market is not included.
    pub final_capital: f64,
    /// Position left at sequence end (no forced liquidation).
    pub open_position: PositionState,
}

impl SimulationOutput {
    pub fn step_count(&self) -> usize {
        self.trajectory.len()
    }
}

/// All-capital-in/out, long-only trade simulator.
#[derive(Debug, Clone, PartialEq)]
pub struct Simulator {
    initial_capital: f64,
    redundant_signals: RedundantSignalPolicy,
}

impl Simulator {
    pub fn new(initial_capital: f64) -> Result<Self, BacktestError> {
        validate_capital(initial_capital)?;
        Ok(Self {
            initial_capital,
            redundant_signals: RedundantSignalPolicy::default(),
        })
    }

    pub fn with_redundant_signals(mut self, policy: RedundantSignalPolicy) -> Self {
        self.redundant_signals = policy;
        self
    }

    pub fn initial_capital(&self) -> f64 {
        self.initial_capital
    }

    pub fn redundant_signals(&self) -> RedundantSignalPolicy {
        self.redundant_signals
    }

    /// Run the signals against the prices in one forward pass.
    ///
    /// Inputs are validated before the first step, so a length mismatch or a
    /// bad price never produces partial output. Zero-length input is valid.
    pub fn simulate(
        &self,
        signals: &[Signal],
        prices: &[f64],
    ) -> Result<SimulationOutput, BacktestError> {
        validate_inputs(signals, prices)?;

        let mut state = SimState::with_capacity(self.initial_capital, signals.len());
        for (t, (&signal, &price)) in signals.iter().zip(prices).enumerate() {
            match state.step(t, signal, price, self.redundant_signals)? {
                StepOutcome::Entered { entry_price } => {
                    debug!(step = t, price = entry_price, "entered long");
                }
                StepOutcome::Exited { profit } => {
                    debug!(step = t, price, profit, capital = state.capital, "exited long");
                }
                StepOutcome::Redundant(signal) => {
                    trace!(step = t, %signal, "ignored redundant signal");
                }
                StepOutcome::Held => {}
            }
        }

        if let PositionState::Long { entry_step, .. } = state.position {
            debug!(entry_step, "position still open at sequence end");
        }

        Ok(SimulationOutput {
            final_capital: state.capital,
            open_position: state.position,
            trajectory: state.trajectory,
            trades: state.trades,
        })
    }
}

/// Convenience wrapper: `Simulator::new(initial_capital)?.simulate(signals, prices)`.
pub fn simulate(
    initial_capital: f64,
    signals: &[Signal],
    prices: &[f64],
) -> Result<SimulationOutput, BacktestError> {
    Simulator::new(initial_capital)?.simulate(signals, prices)
}

pub(crate) fn validate_capital(initial_capital: f64) -> Result<(), BacktestError> {
    if !(initial_capital.is_finite() && initial_capital > 0.0) {
        return Err(BacktestError::invalid(format!(
            "initial capital must be positive and finite, got {initial_capital}"
        )));
    }
    Ok(())
}

fn validate_inputs(signals: &[Signal], prices: &[f64]) -> Result<(), BacktestError> {
    if signals.len() != prices.len() {
        return Err(BacktestError::invalid(format!(
            "signal/price length mismatch: {} signals, {} prices",
            signals.len(),
            prices.len()
        )));
    }
    if let Some((t, price)) = prices
        .iter()
        .enumerate()
        .find(|(_, p)| !(p.is_finite() && **p > 0.0))
    {
        return Err(BacktestError::invalid(format!(
            "price at step {t} must be positive and finite, got {price}"
        )));
    }
    Ok(())
}
