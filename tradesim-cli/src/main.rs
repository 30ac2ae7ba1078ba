//! TradeSim CLI — run, demo and sweep commands.
//!
//! Commands:
//! - `run` — backtest one signal/price series (CSV, TOML config, or synthetic)
//! - `demo` — run the built-in ten-step reference scenario
//! - `sweep` — run every input against every capital, in parallel by default

mod logging;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tradesim_core::{RedundantSignalPolicy, Signal};
use tradesim_runner::{
    load_input_csv, run_backtest, run_from_config, save_artifacts, synthetic_input,
    BacktestInput, BacktestResult, ParamGrid, ParamSweep, RunConfig,
};

use crate::logging::{init_logging, LogFormat};

#[derive(Parser)]
#[command(
    name = "tradesim",
    about = "TradeSim CLI — signal-driven long-only backtesting"
)]
struct Cli {
    /// Log output format: pretty, compact or json. Level comes from RUST_LOG.
    #[arg(long, global = true, default_value = "compact")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Backtest one signal/price series.
    Run {
        /// CSV file with `signal` and `price` columns.
        #[arg(long)]
        input: Option<PathBuf>,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Generate a synthetic series with this many steps instead of reading input.
        #[arg(long)]
        synthetic: Option<usize>,

        /// Seed for --synthetic.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Initial capital. Overrides the config file value.
        #[arg(long)]
        capital: Option<f64>,

        /// Fail on a Buy while long or a Sell while flat.
        #[arg(long, default_value_t = false)]
        strict: bool,

        /// Output directory for artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
    /// Run the built-in reference scenario.
    Demo,
    /// Run every input against every capital value.
    Sweep {
        /// CSV inputs.
        #[arg(long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Initial capital values.
        #[arg(long, num_args = 1.., default_values_t = vec![100_000.0])]
        capital: Vec<f64>,

        /// Run jobs one at a time.
        #[arg(long, default_value_t = false)]
        serial: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format)?;

    match cli.command {
        Commands::Run {
            input,
            config,
            synthetic,
            seed,
            capital,
            strict,
            output_dir,
        } => run_cmd(input, config, synthetic, seed, capital, strict, output_dir),
        Commands::Demo => demo_cmd(),
        Commands::Sweep {
            input,
            capital,
            serial,
        } => sweep_cmd(input, capital, serial),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_cmd(
    input_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    synthetic: Option<usize>,
    seed: u64,
    capital: Option<f64>,
    strict: bool,
    output_dir: PathBuf,
) -> Result<()> {
    if input_path.is_some() && synthetic.is_some() {
        bail!("--input and --synthetic are mutually exclusive");
    }

    let mut config = match &config_path {
        Some(path) => RunConfig::from_file(path)?,
        None => RunConfig::default(),
    };
    if let Some(capital) = capital {
        config.backtest.initial_capital = capital;
    }
    if strict {
        config.backtest.redundant_signals = RedundantSignalPolicy::Reject;
    }
    config.validate()?;

    let result = if let Some(path) = input_path {
        let input = load_input_csv(&path)?;
        run_backtest(&config, &input)?
    } else if let Some(steps) = synthetic {
        run_backtest(&config, &synthetic_input(seed, steps))?
    } else if config.input.is_some() {
        run_from_config(&config)?
    } else {
        bail!("one of --input, --synthetic or a config with an [input] section is required");
    };

    print_summary(&result);

    let run_dir = save_artifacts(&result, &output_dir)?;
    println!("Artifacts saved to: {}", run_dir.display());

    Ok(())
}

fn demo_cmd() -> Result<()> {
    use Signal::{Buy as B, Hold as H, Sell as S};

    let input = BacktestInput::new(
        "demo",
        vec![B, H, H, S, B, H, S, H, B, S],
        vec![10.0, 10.2, 10.5, 10.8, 10.6, 10.9, 11.2, 11.0, 11.5, 12.0],
    );
    let result = run_backtest(&RunConfig::default(), &input)?;
    print_summary(&result);

    println!("--- Trades ---");
    println!(
        "{:>5} {:>10} {:>5} {:>10} {:>12}",
        "Entry", "Price", "Exit", "Price", "Profit"
    );
    for t in &result.trades {
        println!(
            "{:>5} {:>10.2} {:>5} {:>10.2} {:>12.2}",
            t.entry_step, t.entry_price, t.exit_step, t.exit_price, t.profit
        );
    }
    println!();
    Ok(())
}

fn sweep_cmd(inputs: Vec<PathBuf>, capitals: Vec<f64>, serial: bool) -> Result<()> {
    let inputs = inputs
        .iter()
        .map(|path| load_input_csv(path).with_context(|| format!("loading {}", path.display())))
        .collect::<Result<Vec<_>>>()?;

    let grid = ParamGrid::with_capitals(capitals);
    let results = ParamSweep::new()
        .with_parallelism(!serial)
        .sweep(&grid, &RunConfig::default(), &inputs)?;

    println!(
        "{:<20} {:>14} {:>10} {:>10} {:>8} {:>7}",
        "Input", "Capital", "Return", "MaxDD", "WinRate", "Trades"
    );
    println!("{}", "-".repeat(74));
    for r in results.all() {
        println!(
            "{:<20} {:>14.2} {:>9.2}% {:>9.2}% {:>7.1}% {:>7}",
            r.label,
            r.initial_capital,
            r.summary.total_return * 100.0,
            r.summary.max_drawdown * 100.0,
            r.summary.win_rate * 100.0,
            r.summary.trade_count
        );
    }

    if let Some(best) = results.best() {
        println!();
        println!(
            "Best: {} @ {:.2} ({:.2}%)",
            best.label,
            best.initial_capital,
            best.summary.total_return * 100.0
        );
    }
    Ok(())
}

fn print_summary(result: &BacktestResult) {
    println!();
    println!("=== Backtest Result ===");
    println!("Input:          {}", result.label);
    println!("Run:            {}", result.run_id);
    println!("Steps:          {}", result.step_count);
    println!("Trades:         {}", result.summary.trade_count);
    println!();
    println!("--- Performance ---");
    println!("Initial:        {:.2}", result.initial_capital);
    println!("Final:          {:.2}", result.final_capital);
    println!(
        "Total Return:   {:.2}%",
        result.summary.total_return * 100.0
    );
    println!(
        "Max Drawdown:   {:.2}%",
        result.summary.max_drawdown * 100.0
    );
    println!(
        "Win Rate:       {:.1}% ({}/{} trades)",
        result.summary.win_rate * 100.0,
        result.summary.winning_trades,
        result.summary.trade_count
    );
    if result.has_synthetic {
        println!();
        println!("WARNING: Results based on SYNTHETIC data");
    }
    if let Some(entry_price) = result.open_position.entry_price() {
        println!("WARNING: position still open (entered at {entry_price:.2}), not included in realized P&L");
    }
    println!();
}
