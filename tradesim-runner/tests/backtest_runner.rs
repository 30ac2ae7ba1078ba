//! Integration tests for the runner: config file → CSV input → result → artifacts.
//!
//! Uses the reference signal/price series written to a temp directory.

use std::path::Path;

use tradesim_core::{BacktestError, Signal};
use tradesim_runner::{
    import_json, load_artifacts, load_input_csv, run_backtest, run_from_config, save_artifacts,
    export_json, RunConfig, RunError, SCHEMA_VERSION,
};

const REFERENCE_CSV: &str = "\
day,signal,price
1,1,10
2,0,10.2
3,0,10.5
4,-1,10.8
5,1,10.6
6,0,10.9
7,-1,11.2
8,0,11.0
9,1,11.5
10,-1,12.0
";

fn write_reference(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("reference.csv");
    std::fs::write(&path, REFERENCE_CSV).unwrap();
    path
}

#[test]
fn csv_input_reference_run() {
    let dir = tempfile::tempdir().unwrap();
    let input = load_input_csv(&write_reference(dir.path())).unwrap();
    assert_eq!(input.label, "reference");
    assert_eq!(input.len(), 10);
    assert_eq!(input.signals[3], Signal::Sell);

    let result = run_backtest(&RunConfig::default(), &input).unwrap();
    assert_eq!(result.step_count, 10);
    assert_eq!(result.equity_curve.len(), 10);
    assert_eq!(result.summary.trade_count, 3);
    assert_eq!(result.summary.win_rate, 1.0);
    assert_eq!(result.summary.max_drawdown, 0.0);

    let expected = 1.08 * (11.2 / 10.6) * (12.0 / 11.5) - 1.0;
    assert!((result.summary.total_return - expected).abs() < 1e-12);
    assert!((result.final_capital - 100_000.0 * (1.0 + expected)).abs() < 1e-6);
    assert!(result.open_position.is_flat());
    assert!(!result.has_synthetic);
}

#[test]
fn config_file_with_relative_input_path() {
    let dir = tempfile::tempdir().unwrap();
    write_reference(dir.path());
    let config_path = dir.path().join("run.toml");
    std::fs::write(
        &config_path,
        "[backtest]\ninitial_capital = 50000.0\n\n[input]\npath = \"reference.csv\"\n",
    )
    .unwrap();

    let config = RunConfig::from_file(&config_path).unwrap();
    let result = run_from_config(&config).unwrap();
    assert_eq!(result.initial_capital, 50_000.0);
    assert_eq!(result.summary.trade_count, 3);
}

#[test]
fn strict_config_rejects_redundant_buy() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("dup.csv");
    std::fs::write(&input_path, "signal,price\nbuy,10\nbuy,11\nsell,12\n").unwrap();

    let mut config = RunConfig::from_toml(
        "[backtest]\ninitial_capital = 1000.0\nredundant_signals = \"reject\"\n",
    )
    .unwrap();
    config.input = Some(tradesim_runner::config::InputSection { path: input_path });

    let err = run_from_config(&config).unwrap_err();
    assert!(matches!(
        err,
        RunError::Backtest(BacktestError::RedundantSignal { step: 1, .. })
    ));
}

#[test]
fn missing_input_file_is_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_input_csv(&dir.path().join("nope.csv")).unwrap_err();
    assert!(err.to_string().contains("nope.csv"));
}

#[test]
fn artifacts_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let input = load_input_csv(&write_reference(dir.path())).unwrap();
    let result = run_backtest(&RunConfig::default(), &input).unwrap();

    let out_dir = dir.path().join("results");
    let run_dir = save_artifacts(&result, &out_dir).unwrap();
    assert_eq!(run_dir, out_dir.join(&result.run_id));
    assert!(run_dir.join("trades.csv").exists());
    assert!(run_dir.join("equity.csv").exists());

    let trades_csv = std::fs::read_to_string(run_dir.join("trades.csv")).unwrap();
    assert_eq!(trades_csv.lines().count(), 4);
    let equity_csv = std::fs::read_to_string(run_dir.join("equity.csv")).unwrap();
    assert_eq!(equity_csv.lines().count(), 11);

    let loaded = load_artifacts(&run_dir).unwrap();
    assert_eq!(loaded, result);
}

#[test]
fn newer_schema_version_rejected() {
    let input = tradesim_runner::BacktestInput::new("t", vec![Signal::Hold], vec![1.0]);
    let mut result = run_backtest(&RunConfig::default(), &input).unwrap();
    result.schema_version = SCHEMA_VERSION + 1;
    let json = export_json(&result).unwrap();
    let err = import_json(&json).unwrap_err();
    assert!(err.to_string().contains("unsupported schema version"));
}

#[test]
fn missing_schema_version_defaults_to_current() {
    let input = tradesim_runner::BacktestInput::new("t", vec![Signal::Hold], vec![1.0]);
    let result = run_backtest(&RunConfig::default(), &input).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&export_json(&result).unwrap()).unwrap();
    value.as_object_mut().unwrap().remove("schema_version");
    let loaded = import_json(&value.to_string()).unwrap();
    assert_eq!(loaded.schema_version, SCHEMA_VERSION);
}
