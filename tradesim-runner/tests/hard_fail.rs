use proptest::prelude::*;
use tradesim_runner::{
    run_backtest, synthetic_input, BacktestInput, ParamGrid, ParamSweep, RunConfig,
};

fn synthetic_inputs() -> Vec<BacktestInput> {
    (0..8).map(|seed| synthetic_input(seed, 750)).collect()
}

#[test]
fn hard_fail_concurrency_torture() {
    let grid = ParamGrid::with_capitals(vec![10_000.0, 100_000.0, 1_000_000.0]);
    let inputs = synthetic_inputs();
    let base = RunConfig::default();

    let results_serial = ParamSweep::new()
        .with_parallelism(false)
        .sweep(&grid, &base, &inputs)
        .unwrap();
    let results_parallel = ParamSweep::new()
        .with_parallelism(true)
        .sweep(&grid, &base, &inputs)
        .unwrap();

    assert_eq!(results_serial.len(), inputs.len() * grid.size());
    assert_eq!(results_serial.len(), results_parallel.len());

    for (left, right) in results_serial.all().iter().zip(results_parallel.all()) {
        assert_eq!(left.run_id, right.run_id);
        assert_eq!(left.equity_curve, right.equity_curve);
        assert_eq!(left.trades, right.trades);
        assert_eq!(left.summary, right.summary);
    }
}

#[test]
fn hard_fail_synthetic_results_are_tagged() {
    let result = run_backtest(&RunConfig::default(), &synthetic_input(3, 100)).unwrap();
    assert!(result.has_synthetic);
    assert_eq!(result.label, "synthetic-3");
}

proptest! {
    /// Rerunning the same config on the same data reproduces it exactly.
    #[test]
    fn hard_fail_rerun_is_bit_identical(seed in 0u64..1_000, steps in 1usize..400) {
        let input = synthetic_input(seed, steps);
        let config = RunConfig::default();
        let first = run_backtest(&config, &input).unwrap();
        let second = run_backtest(&config, &input).unwrap();
        prop_assert_eq!(first, second);
    }
}
