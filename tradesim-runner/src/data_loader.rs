//! Input loading for the runner: aligned signal/price series from CSV, or synthetic.
//!
//! The CSV must have a header with `signal` and `price` columns; any other
//! columns (dates, symbols) are ignored and alignment is by row. Signals may
//! be written as `1 / 0 / -1` or `buy / hold / sell`.
//!
//! Synthetic data is a developer-only mode for smoke runs and benchmarks.

use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tradesim_core::Signal;

/// Errors from the input loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: bad signal '{value}'")]
    Signal { row: usize, value: String },

    #[error("row {row}: bad price '{value}'")]
    Price { row: usize, value: String },
}

/// One aligned input series, ready for the simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestInput {
    /// Human-readable name (file stem, `synthetic-<seed>`, ...).
    pub label: String,
    pub signals: Vec<Signal>,
    pub prices: Vec<f64>,
    /// Set for generated series so results can be tagged.
    #[serde(default)]
    pub synthetic: bool,
}

impl BacktestInput {
    pub fn new(label: impl Into<String>, signals: Vec<Signal>, prices: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            signals,
            prices,
            synthetic: false,
        }
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

/// Load a signal/price CSV from disk.
pub fn load_input_csv(path: &Path) -> Result<BacktestInput, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let label = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    read_input_csv(file, label)
}

/// Parse a signal/price CSV from any reader.
pub fn read_input_csv<R: std::io::Read>(
    reader: R,
    label: impl Into<String>,
) -> Result<BacktestInput, LoadError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers()?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or(LoadError::MissingColumn(name))
    };
    let signal_col = column("signal")?;
    let price_col = column("price")?;

    let mut signals = Vec::new();
    let mut prices = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        // Row numbers are 1-based data rows, header excluded.
        let row = i + 1;

        let raw_signal = record.get(signal_col).unwrap_or_default();
        let signal = raw_signal.parse::<Signal>().map_err(|_| LoadError::Signal {
            row,
            value: raw_signal.to_string(),
        })?;

        let raw_price = record.get(price_col).unwrap_or_default();
        let price = raw_price
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite() && *p > 0.0)
            .ok_or_else(|| LoadError::Price {
                row,
                value: raw_price.to_string(),
            })?;

        signals.push(signal);
        prices.push(price);
    }

    Ok(BacktestInput::new(label, signals, prices))
}

/// Generate a seeded random-walk price series with a random signal stream.
///
/// Same seed → same series. Prices start at 100 and move by up to ±2% per
/// step; roughly one step in ten is a Buy and one in ten a Sell.
pub fn synthetic_input(seed: u64, steps: usize) -> BacktestInput {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut price = 100.0_f64;
    let mut signals = Vec::with_capacity(steps);
    let mut prices = Vec::with_capacity(steps);

    for _ in 0..steps {
        let change: f64 = rng.gen_range(-0.02..0.02);
        price = (price * (1.0 + change)).max(0.01);
        prices.push(price);

        let roll: f64 = rng.gen();
        let signal = if roll < 0.1 {
            Signal::Buy
        } else if roll < 0.2 {
            Signal::Sell
        } else {
            Signal::Hold
        };
        signals.push(signal);
    }

    BacktestInput {
        label: format!("synthetic-{seed}"),
        signals,
        prices,
        synthetic: true,
    }
}
