//! Parameter sweeps: many independent runs, optionally in parallel.
//!
//! Each job owns its own simulator and state; nothing is shared between
//! runs, so the parallel path needs no locking. Results come back in grid
//! order regardless of scheduling.

use rayon::prelude::*;
use std::collections::HashMap;
use tracing::info;

use tradesim_core::RedundantSignalPolicy;

use crate::config::RunConfig;
use crate::data_loader::BacktestInput;
use crate::runner::{run_backtest, BacktestResult, RunError};

/// Parameter grid specification.
///
/// Every input is run once per combination of the listed values.
#[derive(Debug, Clone)]
pub struct ParamGrid {
    /// Initial capital values to test
    pub initial_capitals: Vec<f64>,

    /// Redundant-signal policies to test
    pub redundant_signals: Vec<RedundantSignalPolicy>,
}

impl Default for ParamGrid {
    fn default() -> Self {
        Self {
            initial_capitals: vec![100_000.0],
            redundant_signals: vec![RedundantSignalPolicy::Ignore],
        }
    }
}

impl ParamGrid {
    pub fn with_capitals(initial_capitals: Vec<f64>) -> Self {
        Self {
            initial_capitals,
            ..Self::default()
        }
    }

    /// Number of configurations per input.
    pub fn size(&self) -> usize {
        self.initial_capitals.len() * self.redundant_signals.len()
    }

    /// Generates all configurations in the grid.
    pub fn generate_configs(&self, base_config: &RunConfig) -> Vec<RunConfig> {
        let mut configs = Vec::with_capacity(self.size());
        for &capital in &self.initial_capitals {
            for &policy in &self.redundant_signals {
                let mut config = base_config.clone();
                config.backtest.initial_capital = capital;
                config.backtest.redundant_signals = policy;
                configs.push(config);
            }
        }
        configs
    }
}

/// Parameter sweep executor.
#[derive(Debug, Clone)]
pub struct ParamSweep {
    parallel: bool,
}

impl Default for ParamSweep {
    fn default() -> Self {
        Self::new()
    }
}

impl ParamSweep {
    pub fn new() -> Self {
        Self { parallel: true }
    }

    /// Enables or disables parallel execution.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Run every (input × grid config) combination.
    ///
    /// Fails with the first error encountered; no partial results.
    pub fn sweep(
        &self,
        grid: &ParamGrid,
        base_config: &RunConfig,
        inputs: &[BacktestInput],
    ) -> Result<SweepResults, RunError> {
        self.sweep_with_progress(grid, base_config, inputs, |_, _, _| {})
    }

    /// Executes a sweep with progress reporting.
    ///
    /// The callback is invoked after each backtest completes with:
    /// - Current job index (0-based)
    /// - Total number of jobs
    /// - The completed result
    pub fn sweep_with_progress<F>(
        &self,
        grid: &ParamGrid,
        base_config: &RunConfig,
        inputs: &[BacktestInput],
        progress_callback: F,
    ) -> Result<SweepResults, RunError>
    where
        F: Fn(usize, usize, &BacktestResult) + Send + Sync,
    {
        let configs = grid.generate_configs(base_config);
        let jobs: Vec<(&BacktestInput, &RunConfig)> = inputs
            .iter()
            .flat_map(|input| configs.iter().map(move |config| (input, config)))
            .collect();
        let total = jobs.len();
        info!(jobs = total, parallel = self.parallel, "starting sweep");

        let run_job = |(idx, &(input, config)): (usize, &(&BacktestInput, &RunConfig))|
         -> Result<BacktestResult, RunError> {
            let result = run_backtest(config, input)?;
            progress_callback(idx, total, &result);
            Ok(result)
        };

        let results: Vec<BacktestResult> = if self.parallel {
            jobs.par_iter()
                .enumerate()
                .map(run_job)
                .collect::<Result<Vec<_>, _>>()?
        } else {
            jobs.iter()
                .enumerate()
                .map(run_job)
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(SweepResults::new(results))
    }
}

/// Results from a parameter sweep, in grid order.
#[derive(Debug)]
pub struct SweepResults {
    results: Vec<BacktestResult>,
    by_run_id: HashMap<String, usize>,
}

impl SweepResults {
    fn new(results: Vec<BacktestResult>) -> Self {
        let by_run_id = results
            .iter()
            .enumerate()
            .map(|(i, r)| (r.run_id.clone(), i))
            .collect();

        Self { results, by_run_id }
    }

    /// Returns all results as a slice.
    pub fn all(&self) -> &[BacktestResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Gets a result by RunId.
    pub fn get(&self, run_id: &str) -> Option<&BacktestResult> {
        self.by_run_id.get(run_id).map(|&i| &self.results[i])
    }

    /// Returns results sorted by total return (descending).
    pub fn sorted_by_return(&self) -> Vec<&BacktestResult> {
        let mut sorted: Vec<_> = self.results.iter().collect();
        sorted.sort_by(|a, b| b.summary.total_return.total_cmp(&a.summary.total_return));
        sorted
    }

    /// Returns the best result by total return.
    pub fn best(&self) -> Option<&BacktestResult> {
        self.sorted_by_return().into_iter().next()
    }
}
