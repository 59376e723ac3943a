//! Dated price and signal tables.
//!
//! Both tables are column-oriented: a shared strictly-increasing date axis
//! plus one column per ticker. `PriceTable` cells are f64 with NaN meaning
//! "no quote ever seen yet"; `SignalTable` cells are plain bools. Neither
//! table is mutated after construction — every transform returns a new one.

use crate::data::provider::RawQuote;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Adjusted-close prices for a universe on a common date axis.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    dates: Vec<NaiveDate>,
    tickers: Vec<String>,
    /// One column per ticker, parallel to `tickers`; each column has
    /// `dates.len()` cells.
    columns: Vec<Vec<f64>>,
}

impl PriceTable {
    /// Build a table from per-symbol quote lists.
    ///
    /// Dates are the union of all symbols' dates. Dates on which no symbol
    /// traded are dropped, then each column is forward-filled, so a NaN only
    /// survives before a ticker's first quote. Tickers come out sorted
    /// (BTreeMap order), which keeps downstream output deterministic.
    pub fn from_quotes(quotes: BTreeMap<String, Vec<RawQuote>>) -> Self {
        let mut all_dates = BTreeSet::new();
        for series in quotes.values() {
            for q in series {
                all_dates.insert(q.date);
            }
        }
        let dates: Vec<NaiveDate> = all_dates.into_iter().collect();

        let mut tickers = Vec::with_capacity(quotes.len());
        let mut columns = Vec::with_capacity(quotes.len());

        for (symbol, series) in &quotes {
            let by_date: BTreeMap<NaiveDate, f64> =
                series.iter().map(|q| (q.date, q.adj_close)).collect();

            let mut column = Vec::with_capacity(dates.len());
            let mut last = f64::NAN;
            for date in &dates {
                if let Some(&px) = by_date.get(date) {
                    last = px;
                }
                column.push(last);
            }

            tickers.push(symbol.clone());
            columns.push(column);
        }

        Self {
            dates,
            tickers,
            columns,
        }
    }

    /// Build directly from columns. Used by tests and synthetic pipelines;
    /// panics if a column length disagrees with the axis.
    pub fn from_columns(dates: Vec<NaiveDate>, columns: Vec<(String, Vec<f64>)>) -> Self {
        let mut tickers = Vec::with_capacity(columns.len());
        let mut cols = Vec::with_capacity(columns.len());
        for (ticker, col) in columns {
            assert_eq!(
                col.len(),
                dates.len(),
                "column '{ticker}' length does not match date axis"
            );
            tickers.push(ticker);
            cols.push(col);
        }
        Self {
            dates,
            tickers,
            columns: cols,
        }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Column for a ticker, if present.
    pub fn column(&self, ticker: &str) -> Option<&[f64]> {
        let idx = self.tickers.iter().position(|t| t == ticker)?;
        Some(&self.columns[idx])
    }

    /// Price by (ticker index, date index). NaN means no quote yet.
    pub fn price_at(&self, ticker_idx: usize, date_idx: usize) -> f64 {
        self.columns[ticker_idx][date_idx]
    }

    /// A copy restricted to dates on or after `start`.
    pub fn window_from(&self, start: NaiveDate) -> Self {
        self.select(|d| d >= start)
    }

    /// A copy restricted to dates in `keep` (axis intersection).
    pub fn restrict_to(&self, keep: &BTreeSet<NaiveDate>) -> Self {
        self.select(|d| keep.contains(&d))
    }

    fn select(&self, pred: impl Fn(NaiveDate) -> bool) -> Self {
        let idx: Vec<usize> = self
            .dates
            .iter()
            .enumerate()
            .filter(|(_, d)| pred(**d))
            .map(|(i, _)| i)
            .collect();

        Self {
            dates: idx.iter().map(|&i| self.dates[i]).collect(),
            tickers: self.tickers.clone(),
            columns: self
                .columns
                .iter()
                .map(|col| idx.iter().map(|&i| col[i]).collect())
                .collect(),
        }
    }
}

/// Boolean trend-status table on the same shape as a `PriceTable`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalTable {
    dates: Vec<NaiveDate>,
    tickers: Vec<String>,
    columns: Vec<Vec<bool>>,
}

impl SignalTable {
    pub fn from_columns(dates: Vec<NaiveDate>, columns: Vec<(String, Vec<bool>)>) -> Self {
        let mut tickers = Vec::with_capacity(columns.len());
        let mut cols = Vec::with_capacity(columns.len());
        for (ticker, col) in columns {
            assert_eq!(
                col.len(),
                dates.len(),
                "column '{ticker}' length does not match date axis"
            );
            tickers.push(ticker);
            cols.push(col);
        }
        Self {
            dates,
            tickers,
            columns: cols,
        }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn column(&self, ticker: &str) -> Option<&[bool]> {
        let idx = self.tickers.iter().position(|t| t == ticker)?;
        Some(&self.columns[idx])
    }

    pub fn signal_at(&self, ticker_idx: usize, date_idx: usize) -> bool {
        self.columns[ticker_idx][date_idx]
    }

    /// A copy restricted to dates on or after `start`.
    pub fn window_from(&self, start: NaiveDate) -> Self {
        self.select(|d| d >= start)
    }

    /// A copy restricted to dates in `keep`, with each cell ANDed against
    /// `mask(date)`. This is the market-filter primitive: it can only turn
    /// signals off.
    pub fn masked_restrict(
        &self,
        keep: &BTreeSet<NaiveDate>,
        mask: impl Fn(NaiveDate) -> bool,
    ) -> Self {
        let idx: Vec<usize> = self
            .dates
            .iter()
            .enumerate()
            .filter(|(_, d)| keep.contains(*d))
            .map(|(i, _)| i)
            .collect();

        let dates: Vec<NaiveDate> = idx.iter().map(|&i| self.dates[i]).collect();
        let columns = self
            .columns
            .iter()
            .map(|col| {
                idx.iter()
                    .map(|&i| col[i] && mask(self.dates[i]))
                    .collect()
            })
            .collect();

        Self {
            dates,
            tickers: self.tickers.clone(),
            columns,
        }
    }

    fn select(&self, pred: impl Fn(NaiveDate) -> bool) -> Self {
        let idx: Vec<usize> = self
            .dates
            .iter()
            .enumerate()
            .filter(|(_, d)| pred(**d))
            .map(|(i, _)| i)
            .collect();

        Self {
            dates: idx.iter().map(|&i| self.dates[i]).collect(),
            tickers: self.tickers.clone(),
            columns: self
                .columns
                .iter()
                .map(|col| idx.iter().map(|&i| col[i]).collect())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn q(date: &str, px: f64) -> RawQuote {
        RawQuote {
            date: d(date),
            adj_close: px,
        }
    }

    #[test]
    fn union_axis_and_forward_fill() {
        let mut quotes = BTreeMap::new();
        quotes.insert(
            "AAA".to_string(),
            vec![q("2024-01-02", 10.0), q("2024-01-03", 11.0), q("2024-01-04", 12.0)],
        );
        quotes.insert(
            "BBB".to_string(),
            // BBB missing 2024-01-03; forward fill carries 20.0
            vec![q("2024-01-02", 20.0), q("2024-01-04", 22.0)],
        );

        let table = PriceTable::from_quotes(quotes);

        assert_eq!(table.dates(), &[d("2024-01-02"), d("2024-01-03"), d("2024-01-04")]);
        assert_eq!(table.tickers(), &["AAA".to_string(), "BBB".to_string()]);
        assert_eq!(table.column("AAA").unwrap(), &[10.0, 11.0, 12.0]);
        assert_eq!(table.column("BBB").unwrap(), &[20.0, 20.0, 22.0]);
    }

    #[test]
    fn nan_before_first_quote() {
        let mut quotes = BTreeMap::new();
        quotes.insert("AAA".to_string(), vec![q("2024-01-02", 10.0), q("2024-01-03", 11.0)]);
        // Late listing: first quote on the second axis date
        quotes.insert("BBB".to_string(), vec![q("2024-01-03", 20.0)]);

        let table = PriceTable::from_quotes(quotes);
        let bbb = table.column("BBB").unwrap();
        assert!(bbb[0].is_nan());
        assert_eq!(bbb[1], 20.0);
    }

    #[test]
    fn tickers_are_sorted() {
        let mut quotes = BTreeMap::new();
        quotes.insert("ZZZ".to_string(), vec![q("2024-01-02", 1.0)]);
        quotes.insert("AAA".to_string(), vec![q("2024-01-02", 2.0)]);
        let table = PriceTable::from_quotes(quotes);
        assert_eq!(table.tickers(), &["AAA".to_string(), "ZZZ".to_string()]);
    }

    #[test]
    fn window_from_keeps_alignment() {
        let dates = vec![d("2024-01-02"), d("2024-01-03"), d("2024-01-04")];
        let table = PriceTable::from_columns(
            dates,
            vec![("AAA".to_string(), vec![1.0, 2.0, 3.0])],
        );
        let w = table.window_from(d("2024-01-03"));
        assert_eq!(w.len(), 2);
        assert_eq!(w.column("AAA").unwrap(), &[2.0, 3.0]);
    }

    #[test]
    fn restrict_to_intersects() {
        let dates = vec![d("2024-01-02"), d("2024-01-03"), d("2024-01-04")];
        let table = PriceTable::from_columns(
            dates,
            vec![("AAA".to_string(), vec![1.0, 2.0, 3.0])],
        );
        let keep: BTreeSet<NaiveDate> = [d("2024-01-02"), d("2024-01-04"), d("2024-01-05")]
            .into_iter()
            .collect();
        let r = table.restrict_to(&keep);
        assert_eq!(r.dates(), &[d("2024-01-02"), d("2024-01-04")]);
        assert_eq!(r.column("AAA").unwrap(), &[1.0, 3.0]);
    }

    #[test]
    fn masked_restrict_only_turns_off() {
        let dates = vec![d("2024-01-02"), d("2024-01-03")];
        let table = SignalTable::from_columns(
            dates.clone(),
            vec![("AAA".to_string(), vec![true, false])],
        );
        let keep: BTreeSet<NaiveDate> = dates.into_iter().collect();
        let masked = table.masked_restrict(&keep, |_| false);
        assert_eq!(masked.column("AAA").unwrap(), &[false, false]);

        let unmasked = table.masked_restrict(&keep, |_| true);
        // Identity mask cannot invent signal
        assert_eq!(unmasked.column("AAA").unwrap(), &[true, false]);
    }

    #[test]
    #[should_panic(expected = "length does not match")]
    fn mismatched_column_panics() {
        PriceTable::from_columns(
            vec![d("2024-01-02")],
            vec![("AAA".to_string(), vec![1.0, 2.0])],
        );
    }
}
