//! Serializable run configuration, loaded from TOML.
//!
//! ```toml
//! [backtest]
//! initial_capital = 100000.0
//! redundant_signals = "ignore"   # or "reject"
//!
//! [input]
//! path = "signals.csv"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tradesim_core::{RedundantSignalPolicy, Signal, Simulator};

/// Unique identifier for a run (content-addressable hash).
pub type RunId = String;

/// Errors from loading or validating a config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Everything needed to reproduce a single run, apart from the input series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    pub backtest: BacktestSection,

    /// Where the signal/price CSV lives, when the config names one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<InputSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BacktestSection {
    pub initial_capital: f64,

    #[serde(default)]
    pub redundant_signals: RedundantSignalPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputSection {
    pub path: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::with_capital(100_000.0)
    }
}

impl RunConfig {
    pub fn with_capital(initial_capital: f64) -> Self {
        Self {
            backtest: BacktestSection {
                initial_capital,
                redundant_signals: RedundantSignalPolicy::Ignore,
            },
            input: None,
        }
    }

    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file. A relative `[input] path` is resolved against the
    /// config file's directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&text)?;
        if let (Some(input), Some(dir)) = (config.input.as_mut(), path.parent()) {
            if input.path.is_relative() {
                input.path = dir.join(&input.path);
            }
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let capital = self.backtest.initial_capital;
        if !(capital.is_finite() && capital > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "backtest.initial_capital must be positive, got {capital}"
            )));
        }
        Ok(())
    }

    pub fn initial_capital(&self) -> f64 {
        self.backtest.initial_capital
    }

    /// Build the simulator this config describes.
    pub fn simulator(&self) -> Result<Simulator, ConfigError> {
        let sim = Simulator::new(self.backtest.initial_capital)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(sim.with_redundant_signals(self.backtest.redundant_signals))
    }

    /// Deterministic hash of the simulation settings and the input series.
    ///
    /// Two runs with identical settings and data share a RunId. The input
    /// path is not part of the hash; only the data it held is.
    pub fn run_id(&self, signals: &[Signal], prices: &[f64]) -> RunId {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.backtest.initial_capital.to_le_bytes());
        hasher.update(&[self.backtest.redundant_signals as u8]);
        hasher.update(&(signals.len() as u64).to_le_bytes());
        for (signal, price) in signals.iter().zip(prices) {
            hasher.update(&signal.code().to_le_bytes());
            hasher.update(&price.to_le_bytes());
        }
        hasher.finalize().to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[backtest]
initial_capital = 250000.0
redundant_signals = "reject"

[input]
path = "data/signals.csv"
"#;

    #[test]
    fn parses_full_config() {
        let config = RunConfig::from_toml(SAMPLE).unwrap();
        assert_eq!(config.initial_capital(), 250_000.0);
        assert_eq!(
            config.backtest.redundant_signals,
            RedundantSignalPolicy::Reject
        );
        assert_eq!(
            config.input.unwrap().path,
            PathBuf::from("data/signals.csv")
        );
    }

    #[test]
    fn policy_defaults_to_ignore() {
        let config = RunConfig::from_toml("[backtest]\ninitial_capital = 1000.0\n").unwrap();
        assert_eq!(
            config.backtest.redundant_signals,
            RedundantSignalPolicy::Ignore
        );
        assert!(config.input.is_none());
    }

    #[test]
    fn rejects_non_positive_capital() {
        let err = RunConfig::from_toml("[backtest]\ninitial_capital = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_unknown_policy() {
        let err = RunConfig::from_toml(
            "[backtest]\ninitial_capital = 1.0\nredundant_signals = \"warn\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn run_id_deterministic() {
        let config = RunConfig::default();
        let signals = [Signal::Buy, Signal::Sell];
        let prices = [10.0, 11.0];
        let id1 = config.run_id(&signals, &prices);
        let id2 = config.run_id(&signals, &prices);
        assert_eq!(id1, id2, "RunId should be deterministic");
        assert_eq!(id1.len(), 64);
    }

    #[test]
    fn run_id_changes_with_capital_and_data() {
        let signals = [Signal::Buy, Signal::Sell];
        let prices = [10.0, 11.0];
        let base = RunConfig::default().run_id(&signals, &prices);
        assert_ne!(
            base,
            RunConfig::with_capital(50_000.0).run_id(&signals, &prices)
        );
        assert_ne!(base, RunConfig::default().run_id(&signals, &[10.0, 12.0]));
    }

    #[test]
    fn config_serialization_roundtrip() {
        let config = RunConfig::from_toml(SAMPLE).unwrap();
        let text = toml::to_string(&config).unwrap();
        assert_eq!(RunConfig::from_toml(&text).unwrap(), config);
    }
}
