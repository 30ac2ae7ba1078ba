use serde::{Deserialize, Serialize};

/// Binary position state. The entry price exists only while Long.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum PositionState {
    #[default]
    Flat,
    Long { entry_step: usize, entry_price: f64 },
}

impl PositionState {
    pub fn is_long(&self) -> bool {
        matches!(self, Self::Long { .. })
    }

    pub fn is_flat(&self) -> bool {
        matches!(self, Self::Flat)
    }

    pub fn entry_price(&self) -> Option<f64> {
        match self {
            Self::Long { entry_price, .. } => Some(*entry_price),
            Self::Flat => None,
        }
    }

    /// Fractional move from entry to `current_price`; `None` while Flat.
    pub fn unrealized_return(&self, current_price: f64) -> Option<f64> {
        self.entry_price()
            .filter(|entry| *entry > 0.0)
            .map(|entry| (current_price - entry) / entry)
    }
}
