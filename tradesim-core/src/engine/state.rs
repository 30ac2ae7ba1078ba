//! Fold state and the per-step transition function.

use crate::domain::{PositionState, Signal, Trade};
use crate::error::BacktestError;

use super::simulator::RedundantSignalPolicy;

/// What a single step did to the state.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Buy while Flat: position opened, capital unchanged.
    Entered { entry_price: f64 },
    /// Sell while Long: profit realized and a trade appended to the ledger.
    Exited { profit: f64 },
    /// Buy while Long or Sell while Flat, ignored under the lenient policy.
    Redundant(Signal),
    /// Hold.
    Held,
}

/// Everything a simulation run mutates, threaded through [`SimState::step`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimState {
    pub position: PositionState,
    pub capital: f64,
    pub trajectory: Vec<f64>,
    pub trades: Vec<Trade>,
}

impl SimState {
    pub fn new(initial_capital: f64) -> Self {
        Self::with_capacity(initial_capital, 0)
    }

    pub fn with_capacity(initial_capital: f64, steps: usize) -> Self {
        Self {
            position: PositionState::Flat,
            capital: initial_capital,
            trajectory: Vec::with_capacity(steps),
            trades: Vec::new(),
        }
    }

    /// Apply one (signal, price) step and append the resulting capital.
    ///
    /// Profit on exit is the price return applied to the whole current
    /// capital (full reinvestment). On error the state is left as it was
    /// before the call.
    pub fn step(
        &mut self,
        step: usize,
        signal: Signal,
        price: f64,
        policy: RedundantSignalPolicy,
    ) -> Result<StepOutcome, BacktestError> {
        let outcome = match (signal, self.position) {
            (Signal::Buy, PositionState::Flat) => {
                self.position = PositionState::Long {
                    entry_step: step,
                    entry_price: price,
                };
                StepOutcome::Entered { entry_price: price }
            }
            (
                Signal::Sell,
                PositionState::Long {
                    entry_step,
                    entry_price,
                },
            ) => {
                if !(entry_price.is_finite() && entry_price > 0.0) {
                    return Err(BacktestError::InvariantViolation { step, entry_price });
                }
                let capital_before = self.capital;
                let profit = (price - entry_price) / entry_price * capital_before;
                self.capital += profit;
                self.trades.push(Trade {
                    entry_step,
                    entry_price,
                    exit_step: step,
                    exit_price: price,
                    capital_before,
                    profit,
                });
                self.position = PositionState::Flat;
                StepOutcome::Exited { profit }
            }
            (Signal::Buy, PositionState::Long { .. }) | (Signal::Sell, PositionState::Flat) => {
                if policy == RedundantSignalPolicy::Reject {
                    return Err(BacktestError::RedundantSignal { step, signal });
                }
                StepOutcome::Redundant(signal)
            }
            (Signal::Hold, _) => StepOutcome::Held,
        };

        self.trajectory.push(self.capital);
        Ok(outcome)
    }
}
