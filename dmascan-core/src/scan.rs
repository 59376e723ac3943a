//! End-to-end scan orchestration.
//!
//! `run_scan` wires the pipeline together: fetch the universe, align it
//! into a price table, derive signals, apply the market filter, window the
//! last `backtest_years`, simulate, and snapshot the latest date. All dates
//! key off an explicit `as_of` so runs are reproducible.

use crate::config::ScanConfig;
use crate::data::download::fetch_universe;
use crate::data::provider::{DataError, DownloadProgress, PriceProvider};
use crate::filter::apply_market_filter;
use crate::report::{latest_snapshot, SignalSnapshot};
use crate::signal::build_signals;
use crate::sim::{run_backtest, BacktestRun, SimError};
use crate::table::{PriceTable, SignalTable};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors from the scan pipeline.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("backtest error: {0}")]
    Sim(#[from] SimError),
}

/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Today's signal table (post market filter).
    pub snapshot: SignalSnapshot,
    /// Simulated DCA backtest over the configured window.
    pub backtest: BacktestRun,
    /// Dates × tickers actually simulated, for reporting.
    pub simulated_rows: usize,
}

/// Fetch the universe and build the (aligned) price and signal tables,
/// with the market filter applied when configured.
///
/// This is the shared front half of the pipeline; `run_scan` follows it
/// with windowing and simulation, the CLI `signals` command stops here.
pub fn load_tables(
    config: &ScanConfig,
    provider: &dyn PriceProvider,
    progress: &dyn DownloadProgress,
    as_of: NaiveDate,
) -> Result<(PriceTable, SignalTable), ScanError> {
    let start = as_of - chrono::Duration::days(years_to_days(config.lookback_years));

    let quotes = fetch_universe(provider, &config.tickers, start, as_of, progress)?;
    let mut prices = PriceTable::from_quotes(quotes);
    let mut signals = build_signals(&prices);

    // Market regime mask; the proxy axis becomes the working axis
    if config.market_filter {
        let proxy_quotes = fetch_universe(
            provider,
            std::slice::from_ref(&config.market_proxy),
            start,
            as_of,
            progress,
        )?;
        let proxy_prices = PriceTable::from_quotes(proxy_quotes);
        signals = apply_market_filter(&signals, &proxy_prices);

        let keep: BTreeSet<NaiveDate> = signals.dates().iter().copied().collect();
        prices = prices.restrict_to(&keep);
    }

    Ok((prices, signals))
}

/// Run the full scan as of `as_of` (normally today).
pub fn run_scan(
    config: &ScanConfig,
    provider: &dyn PriceProvider,
    progress: &dyn DownloadProgress,
    as_of: NaiveDate,
) -> Result<ScanOutcome, ScanError> {
    let (prices, signals) = load_tables(config, provider, progress, as_of)?;

    let snapshot = latest_snapshot(&prices, &signals).ok_or(DataError::NoData)?;

    // Window the last `backtest_years` of the aligned axis
    let window_start = snapshot.date - chrono::Duration::days(years_to_days(config.backtest_years));
    let window_prices = prices.window_from(window_start);
    let window_signals = signals.window_from(window_start);

    let backtest = run_backtest(&window_prices, &window_signals, config.contribution)?;

    Ok(ScanOutcome {
        snapshot,
        simulated_rows: window_prices.len(),
        backtest,
    })
}

fn years_to_days(years: u32) -> i64 {
    (years as f64 * 365.25) as i64
}
