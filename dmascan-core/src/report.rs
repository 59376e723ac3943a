//! Latest-date signal snapshot.
//!
//! The snapshot is the "what would I buy today" view: one row per ticker
//! with its last price and trend status. Rendering (console table, CSV) is
//! the CLI's concern.

use crate::table::{PriceTable, SignalTable};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One ticker's status on the snapshot date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRow {
    pub ticker: String,
    /// Last adjusted close; None when the ticker never traded.
    pub price: Option<f64>,
    pub in_trend: bool,
}

/// The latest date's price/signal pairs, rows sorted by ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSnapshot {
    pub date: NaiveDate,
    pub rows: Vec<SignalRow>,
}

/// Snapshot of the final date of aligned tables; None for empty tables.
pub fn latest_snapshot(prices: &PriceTable, signals: &SignalTable) -> Option<SignalSnapshot> {
    let date = prices.last_date()?;
    let last_idx = prices.len() - 1;

    let rows = prices
        .tickers()
        .iter()
        .enumerate()
        .map(|(t, ticker)| {
            let px = prices.price_at(t, last_idx);
            SignalRow {
                ticker: ticker.clone(),
                price: if px.is_nan() { None } else { Some(px) },
                in_trend: signals.signal_at(t, last_idx),
            }
        })
        .collect();

    Some(SignalSnapshot { date, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn snapshot_reads_the_last_row() {
        let dates = vec![d("2024-01-02"), d("2024-01-03")];
        let prices = PriceTable::from_columns(
            dates.clone(),
            vec![
                ("AAA".to_string(), vec![10.0, 11.0]),
                ("BBB".to_string(), vec![20.0, 21.0]),
            ],
        );
        let signals = SignalTable::from_columns(
            dates,
            vec![
                ("AAA".to_string(), vec![false, true]),
                ("BBB".to_string(), vec![true, false]),
            ],
        );

        let snap = latest_snapshot(&prices, &signals).unwrap();
        assert_eq!(snap.date, d("2024-01-03"));
        assert_eq!(snap.rows.len(), 2);
        assert_eq!(snap.rows[0].ticker, "AAA");
        assert_eq!(snap.rows[0].price, Some(11.0));
        assert!(snap.rows[0].in_trend);
        assert_eq!(snap.rows[1].ticker, "BBB");
        assert!(!snap.rows[1].in_trend);
    }

    #[test]
    fn never_traded_ticker_has_no_price() {
        let dates = vec![d("2024-01-02")];
        let prices = PriceTable::from_columns(
            dates.clone(),
            vec![("AAA".to_string(), vec![f64::NAN])],
        );
        let signals =
            SignalTable::from_columns(dates, vec![("AAA".to_string(), vec![false])]);

        let snap = latest_snapshot(&prices, &signals).unwrap();
        assert_eq!(snap.rows[0].price, None);
    }

    #[test]
    fn empty_table_has_no_snapshot() {
        let prices = PriceTable::from_columns(Vec::new(), Vec::new());
        let signals = SignalTable::from_columns(Vec::new(), Vec::new());
        assert!(latest_snapshot(&prices, &signals).is_none());
    }
}
