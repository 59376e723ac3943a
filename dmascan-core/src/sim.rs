//! Dollar-cost-averaging backtest simulator.
//!
//! Walks aligned price and signal tables in ascending date order with three
//! phases per date:
//!
//! 1. Exit — every held ticker whose signal is off today is liquidated at
//!    today's price. Exits always run before contributions, so a ticker that
//!    drops out of trend on a contribution day cannot receive fresh capital.
//! 2. Contribute — on the first trading day of each calendar month the
//!    fixed contribution lands in cash, which is then split equally across
//!    "active" tickers (tradable today, signal on). With no active ticker
//!    the cash idles until a later contribution day finds one.
//! 3. Value — equity = cash + Σ shares × price over tickers with a quote,
//!    appended to the equity curve.
//!
//! A NaN price means the ticker has not traded yet; such tickers are
//! neither valued, liquidated, nor bought. Prices are forward-filled at
//! table construction, so NaN cannot reappear after a first quote and held
//! shares are always valued at the last known price.

use crate::metrics;
use crate::table::{PriceTable, SignalTable};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum aligned rows for a meaningful backtest (one trading year).
pub const MIN_BACKTEST_ROWS: usize = 252;

/// Errors from the simulator.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("price and signal tables do not share the same date axis")]
    Misaligned,

    #[error(
        "insufficient history: {rows} aligned rows, need at least {MIN_BACKTEST_ROWS} \
         (one trading year)"
    )]
    InsufficientHistory { rows: usize },
}

/// One point of the simulated equity curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

/// Immutable summary of a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestSummary {
    /// Money-weighted annual growth rate of final value over invested.
    pub cagr: f64,
    /// Contribution × contribution-day count, whether deployed or not.
    pub invested: f64,
    /// Last entry of the equity curve.
    pub final_value: f64,
    /// Peak-to-trough decline, as a negative fraction.
    pub max_drawdown: f64,
    /// Number of contribution days encountered.
    pub contribution_count: usize,
}

/// Summary plus the full equity curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestRun {
    pub summary: BacktestSummary,
    pub equity: Vec<EquityPoint>,
}

/// Simulate a fixed monthly contribution DCA plan over aligned tables.
///
/// `prices` and `signals` must share an identical date axis and ticker set;
/// at least [`MIN_BACKTEST_ROWS`] rows are required.
pub fn run_backtest(
    prices: &PriceTable,
    signals: &SignalTable,
    contribution: f64,
) -> Result<BacktestRun, SimError> {
    if prices.dates() != signals.dates() || prices.tickers() != signals.tickers() {
        return Err(SimError::Misaligned);
    }
    let rows = prices.len();
    if rows < MIN_BACKTEST_ROWS {
        return Err(SimError::InsufficientHistory { rows });
    }

    let dates = prices.dates();
    let n_tickers = prices.tickers().len();
    let contribution_day = contribution_days(dates);

    let mut cash = 0.0_f64;
    let mut shares = vec![0.0_f64; n_tickers];
    let mut equity_curve: Vec<EquityPoint> = Vec::with_capacity(rows);
    let mut contribution_count = 0usize;

    for (i, &date) in dates.iter().enumerate() {
        // Phase 1: exit positions whose signal turned off
        for t in 0..n_tickers {
            let px = prices.price_at(t, i);
            if px.is_nan() {
                continue;
            }
            if shares[t] > 0.0 && !signals.signal_at(t, i) {
                cash += shares[t] * px;
                shares[t] = 0.0;
            }
        }

        // Phase 2: monthly contribution, equal-weight buy across active signals
        if contribution_day[i] {
            cash += contribution;
            contribution_count += 1;

            let active: Vec<usize> = (0..n_tickers)
                .filter(|&t| !prices.price_at(t, i).is_nan() && signals.signal_at(t, i))
                .collect();

            if !active.is_empty() && cash > 0.0 {
                let per_ticker = cash / active.len() as f64;
                for &t in &active {
                    shares[t] += per_ticker / prices.price_at(t, i);
                }
                cash = 0.0;
            }
        }

        // Phase 3: mark to market
        let mut equity = cash;
        for t in 0..n_tickers {
            let px = prices.price_at(t, i);
            if !px.is_nan() {
                equity += shares[t] * px;
            }
        }
        equity_curve.push(EquityPoint { date, equity });
    }

    let invested = contribution * contribution_count as f64;
    let final_value = equity_curve.last().map(|p| p.equity).unwrap_or(0.0);
    let values: Vec<f64> = equity_curve.iter().map(|p| p.equity).collect();
    let first_date = equity_curve[0].date;
    let last_date = equity_curve[equity_curve.len() - 1].date;

    Ok(BacktestRun {
        summary: BacktestSummary {
            cagr: metrics::cagr(invested, final_value, first_date, last_date),
            invested,
            final_value,
            max_drawdown: metrics::max_drawdown(&values),
            contribution_count,
        },
        equity: equity_curve,
    })
}

/// Mark the first trading day of each calendar month on the axis.
///
/// The first axis date always counts: it opens whatever month the window
/// starts in.
fn contribution_days(dates: &[NaiveDate]) -> Vec<bool> {
    let mut flags = Vec::with_capacity(dates.len());
    let mut last_month: Option<(i32, u32)> = None;

    for &date in dates {
        let month = (date.year(), date.month());
        flags.push(last_month != Some(month));
        last_month = Some(month);
    }
    flags
}
