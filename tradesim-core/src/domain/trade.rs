//! Trade — a completed round trip, realized at the closing Sell.

use serde::{Deserialize, Serialize};

/// A closed round-trip record.
///
/// Only a Sell that closes a Long creates one, so the ledger is exactly the
/// set of completed round trips. An open position at sequence end has no record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    // ── Entry ──
    pub entry_step: usize,
    pub entry_price: f64,

    // ── Exit ──
    /// 0-based index of the step whose Sell closed the position.
    pub exit_step: usize,
    pub exit_price: f64,

    // ── PnL ──
    /// Total capital right before the exit was realized.
    pub capital_before: f64,
    /// Realized profit in currency units (signed).
    pub profit: f64,
}

impl Trade {
    /// Return on the trade as a fraction of the capital committed.
    pub fn return_pct(&self) -> f64 {
        if self.capital_before <= 0.0 {
            return 0.0;
        }
        self.profit / self.capital_before
    }

    /// Strictly positive profit; a break-even trade counts as a loss.
    pub fn is_winner(&self) -> bool {
        self.profit > 0.0
    }

    pub fn steps_held(&self) -> usize {
        self.exit_step - self.entry_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_trade(profit: f64) -> Trade {
        Trade {
            entry_step: 0,
            entry_price: 10.0,
            exit_step: 3,
            exit_price: 10.0 * (1.0 + profit / 100_000.0),
            capital_before: 100_000.0,
            profit,
        }
    }

    #[test]
    fn return_pct_calculation() {
        let trade = sample_trade(8_000.0);
        assert!((trade.return_pct() - 0.08).abs() < 1e-12);
        assert_eq!(trade.steps_held(), 3);
    }

    #[test]
    fn break_even_is_not_a_winner() {
        assert!(sample_trade(1.0).is_winner());
        assert!(!sample_trade(0.0).is_winner());
        assert!(!sample_trade(-1.0).is_winner());
    }

    #[test]
    fn trade_serialization_roundtrip() {
        let trade = sample_trade(250.0);
        let json = serde_json::to_string(&trade).unwrap();
        let deser: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(trade, deser);
    }
}
