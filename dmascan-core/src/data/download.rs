//! Universe download — fetches every symbol in the watchlist with progress
//! reporting.
//!
//! A symbol the provider cannot resolve is reported and skipped, matching
//! how upstream bulk downloads drop unknown tickers. Transport failures
//! abort the whole run: a scan over partially fetched data would silently
//! change the universe.

use super::provider::{DataError, DownloadProgress, PriceProvider, RawQuote};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Fetch quotes for every symbol in `symbols`.
///
/// Returns `DataError::NoData` when not a single symbol produced quotes.
pub fn fetch_universe(
    provider: &dyn PriceProvider,
    symbols: &[String],
    start: NaiveDate,
    end: NaiveDate,
    progress: &dyn DownloadProgress,
) -> Result<BTreeMap<String, Vec<RawQuote>>, DataError> {
    let total = symbols.len();
    let mut quotes: BTreeMap<String, Vec<RawQuote>> = BTreeMap::new();

    for (i, symbol) in symbols.iter().enumerate() {
        progress.on_start(symbol, i, total);

        match provider.fetch(symbol, start, end) {
            Ok(series) => {
                progress.on_complete(symbol, i, total, &Ok(()));
                quotes.insert(symbol.clone(), series);
            }
            Err(e @ DataError::SymbolNotFound { .. }) => {
                progress.on_complete(symbol, i, total, &Err(e));
            }
            Err(e) => {
                progress.on_complete(
                    symbol,
                    i,
                    total,
                    &Err(DataError::Other(e.to_string())),
                );
                return Err(e);
            }
        }
    }

    if quotes.is_empty() {
        return Err(DataError::NoData);
    }

    Ok(quotes)
}
