//! dmascan core — 200DMA trend scanner and dollar-cost-averaging backtest.
//!
//! The pipeline is a handful of pure transforms over a dated price table:
//! - Data providers (Yahoo Finance, synthetic) produce per-symbol quote lists
//! - `PriceTable` aligns them to a common forward-filled date axis
//! - `signal::build_signals` derives the 200DMA trend table
//! - `filter::apply_market_filter` masks it by the market proxy's own trend
//! - `sim::run_backtest` walks the aligned tables day by day, simulating a
//!   fixed monthly contribution split equally across active signals
//! - `metrics` reduces the equity curve to CAGR and max drawdown

pub mod config;
pub mod data;
pub mod filter;
pub mod indicators;
pub mod metrics;
pub mod report;
pub mod scan;
pub mod signal;
pub mod sim;
pub mod table;

pub use config::ScanConfig;
pub use report::SignalSnapshot;
pub use scan::{run_scan, ScanError, ScanOutcome};
pub use sim::{run_backtest, BacktestRun, BacktestSummary, EquityPoint, SimError};
pub use table::{PriceTable, SignalTable};
