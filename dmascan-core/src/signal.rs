//! 200DMA trend signal.
//!
//! A ticker is "in trend" on a date when its close sits above the 200-day
//! moving average and that average is itself higher than it was 20 sessions
//! earlier (price above a rising long-term mean). Dates inside the warm-up
//! window compare against an undefined SMA and are always false.

use crate::indicators::sma;
use crate::table::{PriceTable, SignalTable};

/// Moving-average window (trading days).
pub const DMA_PERIOD: usize = 200;

/// How far back the slope check looks (trading days).
pub const DMA_SLOPE_LOOKBACK: usize = 20;

/// Derive the trend-status table for every ticker in `prices`.
pub fn build_signals(prices: &PriceTable) -> SignalTable {
    let dates = prices.dates().to_vec();
    let columns = prices
        .tickers()
        .iter()
        .map(|ticker| {
            let closes = prices
                .column(ticker)
                .expect("ticker listed in its own table");
            (ticker.clone(), trend_column(closes))
        })
        .collect();

    SignalTable::from_columns(dates, columns)
}

/// Per-ticker signal column: close > sma200 AND sma200 > sma200[20 back].
///
/// NaN on either side of a comparison yields false, so the signal cannot be
/// true before a full 200-session window plus 20 sessions of slope history.
fn trend_column(closes: &[f64]) -> Vec<bool> {
    let dma = sma(closes, DMA_PERIOD);

    (0..closes.len())
        .map(|i| {
            if i < DMA_SLOPE_LOOKBACK {
                return false;
            }
            let close = closes[i];
            let today = dma[i];
            let back = dma[i - DMA_SLOPE_LOOKBACK];
            if close.is_nan() || today.is_nan() || back.is_nan() {
                return false;
            }
            close > today && today > back
        })
        .collect()
}
