//! Market regime filter.
//!
//! The broad-market proxy (SPY by default) is run through the same 200DMA
//! signal as the universe. On any date where the proxy is not in trend,
//! every ticker's signal is forced false; dates the proxy never traded are
//! removed from the axis entirely. The filter is a pure AND-mask over a new
//! table — it can only remove signal, never add it.

use crate::signal::build_signals;
use crate::table::{PriceTable, SignalTable};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Mask `signals` by the trend status of `proxy_prices`.
///
/// `proxy_prices` is a single-ticker table covering the same lookback
/// horizon as the universe (the proxy needs its own 200-session warm-up).
pub fn apply_market_filter(signals: &SignalTable, proxy_prices: &PriceTable) -> SignalTable {
    let proxy_signals = build_signals(proxy_prices);

    // Single proxy ticker: date -> in-trend
    let proxy_by_date: BTreeMap<NaiveDate, bool> = match proxy_prices.tickers().first() {
        Some(ticker) => {
            let col = proxy_signals
                .column(ticker)
                .expect("proxy ticker listed in its own table");
            proxy_signals
                .dates()
                .iter()
                .copied()
                .zip(col.iter().copied())
                .collect()
        }
        None => BTreeMap::new(),
    };

    let keep: BTreeSet<NaiveDate> = proxy_by_date.keys().copied().collect();
    signals.masked_restrict(&keep, |date| proxy_by_date.get(&date).copied().unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::{DMA_PERIOD, DMA_SLOPE_LOOKBACK};
    use chrono::NaiveDate;

    fn axis(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        (0..n).map(|i| start + chrono::Duration::days(i as i64)).collect()
    }

    fn uptrend(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64).collect()
    }

    fn downtrend(n: usize) -> Vec<f64> {
        (0..n).map(|i| 1000.0 - i as f64).collect()
    }

    const N: usize = DMA_PERIOD + 100;

    #[test]
    fn trending_proxy_passes_signals_through() {
        let dates = axis(N);
        let signals = SignalTable::from_columns(
            dates.clone(),
            vec![("AAA".to_string(), vec![true; N])],
        );
        let proxy = PriceTable::from_columns(dates, vec![("SPY".to_string(), uptrend(N))]);

        let filtered = apply_market_filter(&signals, &proxy);
        let col = filtered.column("AAA").unwrap();

        // Once the proxy's own signal is live, the mask is transparent
        assert!(col[N - 1]);
        assert!(col[N - 40]);
        // During the proxy warm-up everything is forced off
        assert!(!col[DMA_PERIOD + DMA_SLOPE_LOOKBACK - 5]);
    }

    #[test]
    fn bear_proxy_forces_everything_false() {
        let dates = axis(N);
        let signals = SignalTable::from_columns(
            dates.clone(),
            vec![("AAA".to_string(), vec![true; N])],
        );
        let proxy = PriceTable::from_columns(dates, vec![("SPY".to_string(), downtrend(N))]);

        let filtered = apply_market_filter(&signals, &proxy);
        assert!(filtered.column("AAA").unwrap().iter().all(|&s| !s));
    }

    #[test]
    fn proxy_absent_dates_are_dropped() {
        let dates = axis(N);
        let signals = SignalTable::from_columns(
            dates.clone(),
            vec![("AAA".to_string(), vec![true; N])],
        );
        // Proxy only covers the first half of the axis
        let half = N / 2;
        let proxy = PriceTable::from_columns(
            dates[..half].to_vec(),
            vec![("SPY".to_string(), uptrend(half))],
        );

        let filtered = apply_market_filter(&signals, &proxy);
        assert_eq!(filtered.len(), half);
        assert_eq!(filtered.dates(), &dates[..half]);
    }

    #[test]
    fn never_adds_signal() {
        let dates = axis(N);
        let signals = SignalTable::from_columns(
            dates.clone(),
            vec![("AAA".to_string(), vec![false; N])],
        );
        let proxy = PriceTable::from_columns(dates, vec![("SPY".to_string(), uptrend(N))]);

        let filtered = apply_market_filter(&signals, &proxy);
        assert!(filtered.column("AAA").unwrap().iter().all(|&s| !s));
    }

    #[test]
    fn empty_proxy_empties_the_axis() {
        let dates = axis(N);
        let signals = SignalTable::from_columns(
            dates,
            vec![("AAA".to_string(), vec![true; N])],
        );
        let proxy = PriceTable::from_columns(Vec::new(), Vec::new());

        let filtered = apply_market_filter(&signals, &proxy);
        assert!(filtered.is_empty());
    }

    #[test]
    fn input_table_is_untouched() {
        let dates = axis(N);
        let signals = SignalTable::from_columns(
            dates.clone(),
            vec![("AAA".to_string(), vec![true; N])],
        );
        let before = signals.clone();
        let proxy = PriceTable::from_columns(dates, vec![("SPY".to_string(), downtrend(N))]);

        let _ = apply_market_filter(&signals, &proxy);
        assert_eq!(signals, before);
    }
}
