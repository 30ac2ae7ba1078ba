//! Error taxonomy shared by the simulator and the analyzer.

use thiserror::Error;

use crate::domain::Signal;

/// Every way a simulation or analysis can fail.
///
/// All failures are synchronous and all-or-nothing: a failed `simulate`
/// produces no trajectory or ledger, a failed `analyze` produces no summary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BacktestError {
    /// Caller-supplied input violates a precondition (length mismatch,
    /// non-positive capital or price, undecodable signal). Fix and retry.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// `analyze` was handed an empty trajectory: run a simulation first.
    #[error("empty capital history: run a simulation before analyzing")]
    EmptyHistory,

    /// A position was about to be closed against a non-positive entry price.
    /// Indicates broken internal state, not bad user input.
    #[error("invariant violation at step {step}: entry price {entry_price} is not a valid divisor")]
    InvariantViolation { step: usize, entry_price: f64 },

    /// A Buy while Long or a Sell while Flat under the strict policy.
    #[error("redundant {signal} signal at step {step}")]
    RedundantSignal { step: usize, signal: Signal },
}

impl BacktestError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the caller can fix its inputs and retry.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvariantViolation { .. })
    }
}
