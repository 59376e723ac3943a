//! dmascan CLI — daily 200DMA trend scan and DCA backtest.
//!
//! Commands:
//! - `scan` — download the universe, run the backtest, print the report,
//!   and save artifacts (summary.json, equity.csv, signals.csv)
//! - `signals` — print today's signal table only, no backtest

mod artifacts;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use dmascan_core::data::provider::{PriceProvider, StdoutProgress};
use dmascan_core::data::{SyntheticProvider, YahooProvider};
use dmascan_core::report::latest_snapshot;
use dmascan_core::scan::{load_tables, run_scan};
use dmascan_core::{ScanConfig, ScanOutcome, SignalSnapshot};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "dmascan",
    about = "200DMA trend scanner with a monthly-contribution backtest"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full scan: signals, backtest, report, artifacts.
    Scan {
        #[command(flatten)]
        common: CommonOpts,

        /// Monthly contribution in currency units.
        #[arg(long)]
        contribution: Option<f64>,

        /// Backtest window in years, counted back from the latest date.
        #[arg(long)]
        backtest_years: Option<u32>,

        /// Output directory for run artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
    /// Print today's signal table without running a backtest.
    Signals {
        #[command(flatten)]
        common: CommonOpts,
    },
}

#[derive(Args)]
struct CommonOpts {
    /// Path to a TOML config file; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tickers to scan (overrides the config universe).
    #[arg(long, num_args = 1..)]
    tickers: Option<Vec<String>>,

    /// Years of history to download.
    #[arg(long)]
    lookback_years: Option<u32>,

    /// Disable the market regime filter.
    #[arg(long, default_value_t = false)]
    no_market_filter: bool,

    /// Market proxy symbol for the regime filter.
    #[arg(long)]
    proxy: Option<String>,

    /// Use deterministic synthetic data instead of Yahoo Finance.
    #[arg(long, default_value_t = false)]
    synthetic: bool,

    /// Seed for synthetic data.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Run as of this date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    as_of: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            common,
            contribution,
            backtest_years,
            output_dir,
        } => run_scan_cmd(common, contribution, backtest_years, output_dir),
        Commands::Signals { common } => run_signals_cmd(common),
    }
}

fn build_config(
    common: &CommonOpts,
    contribution: Option<f64>,
    backtest_years: Option<u32>,
) -> Result<ScanConfig> {
    let mut config = match &common.config {
        Some(path) => ScanConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ScanConfig::default(),
    };

    if let Some(tickers) = &common.tickers {
        config.tickers = tickers.clone();
    }
    if let Some(years) = common.lookback_years {
        config.lookback_years = years;
    }
    if common.no_market_filter {
        config.market_filter = false;
    }
    if let Some(proxy) = &common.proxy {
        config.market_proxy = proxy.clone();
    }
    if let Some(amount) = contribution {
        config.contribution = amount;
    }
    if let Some(years) = backtest_years {
        config.backtest_years = years;
    }

    config.validate()?;
    Ok(config)
}

fn resolve_as_of(common: &CommonOpts) -> Result<NaiveDate> {
    match &common.as_of {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid --as-of date '{s}'")),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn make_provider(common: &CommonOpts) -> Box<dyn PriceProvider> {
    if common.synthetic {
        Box::new(SyntheticProvider::new(common.seed))
    } else {
        Box::new(YahooProvider::new())
    }
}

fn run_scan_cmd(
    common: CommonOpts,
    contribution: Option<f64>,
    backtest_years: Option<u32>,
    output_dir: PathBuf,
) -> Result<()> {
    let config = build_config(&common, contribution, backtest_years)?;
    let as_of = resolve_as_of(&common)?;
    let provider = make_provider(&common);

    let outcome = run_scan(&config, provider.as_ref(), &StdoutProgress, as_of)?;

    print_report(&config, &outcome);

    let run_dir = artifacts::save_artifacts(&outcome, &config, as_of, &output_dir)?;
    println!("Artifacts saved to: {}", run_dir.display());

    Ok(())
}

fn run_signals_cmd(common: CommonOpts) -> Result<()> {
    let config = build_config(&common, None, None)?;
    let as_of = resolve_as_of(&common)?;
    let provider = make_provider(&common);

    // Signals only: fetch, build, filter, snapshot — skip the simulation
    let (prices, signals) = load_tables(&config, provider.as_ref(), &StdoutProgress, as_of)?;

    match latest_snapshot(&prices, &signals) {
        Some(snapshot) => print_snapshot(&snapshot),
        None => println!("No aligned trading dates - nothing to report."),
    }
    Ok(())
}

fn print_report(config: &ScanConfig, outcome: &ScanOutcome) {
    println!();
    println!("=== 200DMA Trend Scan ===");
    println!("Universe:       {}", config.tickers.join(", "));
    println!("Contribution:   {:.2}/month", config.contribution);
    println!("Backtest years: {}", config.backtest_years);
    println!(
        "Market filter:  {}",
        if config.market_filter {
            format!("ON ({})", config.market_proxy)
        } else {
            "OFF".to_string()
        }
    );
    println!();
    println!("--- Backtest Summary ---");
    let summary = &outcome.backtest.summary;
    println!("Simulated days: {}", outcome.simulated_rows);
    println!("Contributions:  {}", summary.contribution_count);
    println!("Invested:       {:.2}", summary.invested);
    println!("Final Value:    {:.2}", summary.final_value);
    println!("CAGR:           {:.2}%", summary.cagr * 100.0);
    println!("Max Drawdown:   {:.2}%", summary.max_drawdown * 100.0);

    println!();
    print_snapshot(&outcome.snapshot);
}

fn print_snapshot(snapshot: &SignalSnapshot) {
    println!("--- Signals for {} ---", snapshot.date);
    println!("{:<8} {:>12} {:>8}", "Ticker", "Price", "Trend");
    println!("{}", "-".repeat(30));
    for row in &snapshot.rows {
        let price = match row.price {
            Some(p) => format!("{p:.2}"),
            None => "N/A".to_string(),
        };
        println!(
            "{:<8} {:>12} {:>8}",
            row.ticker,
            price,
            if row.in_trend { "BUY" } else { "-" }
        );
    }
}
