//! Reporting and export — JSON and CSV artifact generation.
//!
//! - **JSON**: full round-trip serialization with schema versioning
//! - **CSV**: trade ledger and capital trajectory for external analysis tools
//!
//! All persisted artifacts include a `schema_version` field. Newer versions
//! than this build understands are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tradesim_core::Trade;

use crate::runner::{BacktestResult, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `BacktestResult` to pretty JSON.
pub fn export_json(result: &BacktestResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize BacktestResult to JSON")
}

/// Deserialize a `BacktestResult` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<BacktestResult> {
    let result: BacktestResult =
        serde_json::from_str(json).context("failed to deserialize BacktestResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export the trade ledger as CSV.
///
/// Columns: entry_step, entry_price, exit_step, exit_price, capital_before,
/// profit, return_pct
pub fn export_trades_csv(trades: &[Trade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "entry_step",
        "entry_price",
        "exit_step",
        "exit_price",
        "capital_before",
        "profit",
        "return_pct",
    ])?;

    for t in trades {
        wtr.write_record([
            &t.entry_step.to_string(),
            &format!("{:.6}", t.entry_price),
            &t.exit_step.to_string(),
            &format!("{:.6}", t.exit_price),
            &format!("{:.2}", t.capital_before),
            &format!("{:.2}", t.profit),
            &format!("{:.6}", t.return_pct()),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export a capital trajectory as CSV with step and capital columns.
pub fn export_equity_csv(equity_curve: &[f64]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["step", "capital"])?;
    for (i, eq) in equity_curve.iter().enumerate() {
        wtr.write_record([&i.to_string(), &format!("{:.2}", eq)])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for a single backtest run.
///
/// Creates `{run_id}/` under `output_dir` containing:
/// - `result.json` — the full `BacktestResult`
/// - `trades.csv` — trade ledger
/// - `equity.csv` — step-by-step capital
///
/// Saving the same run twice overwrites the same directory. Returns its path.
pub fn save_artifacts(result: &BacktestResult, output_dir: &Path) -> Result<PathBuf> {
    let run_dir = output_dir.join(&result.run_id);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    let json = export_json(result)?;
    std::fs::write(run_dir.join("result.json"), json)?;

    let trades_csv = export_trades_csv(&result.trades)?;
    std::fs::write(run_dir.join("trades.csv"), trades_csv)?;

    let equity_csv = export_equity_csv(&result.equity_curve)?;
    std::fs::write(run_dir.join("equity.csv"), equity_csv)?;

    Ok(run_dir)
}

/// Load a `BacktestResult` from an artifact directory's result.json.
pub fn load_artifacts(dir: &Path) -> Result<BacktestResult> {
    let path = dir.join("result.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}
