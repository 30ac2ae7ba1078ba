//! Signal — the per-step trading instruction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BacktestError;

/// One trading instruction per time step.
///
/// Upstream signal generators commonly emit `1 / -1 / 0`; that encoding is
/// accepted through [`Signal::from_code`] but is not part of the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    /// Decode the numeric encoding: `1` = Buy, `-1` = Sell, `0` = Hold.
    pub fn from_code(code: i8) -> Result<Self, BacktestError> {
        match code {
            1 => Ok(Self::Buy),
            -1 => Ok(Self::Sell),
            0 => Ok(Self::Hold),
            other => Err(BacktestError::invalid(format!(
                "unknown signal code {other} (expected 1, 0 or -1)"
            ))),
        }
    }

    pub fn code(self) -> i8 {
        match self {
            Self::Buy => 1,
            Self::Sell => -1,
            Self::Hold => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
            Self::Hold => "hold",
        }
    }
}

impl TryFrom<i8> for Signal {
    type Error = BacktestError;

    fn try_from(code: i8) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl FromStr for Signal {
    type Err = BacktestError;

    /// Accepts `buy`/`sell`/`hold` in any case, or the numeric codes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            "hold" => Ok(Self::Hold),
            _ => {
                let code: i8 = trimmed
                    .parse()
                    .map_err(|_| BacktestError::invalid(format!("unknown signal '{trimmed}'")))?;
                Self::from_code(code)
            }
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
