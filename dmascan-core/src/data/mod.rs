//! Data providers and universe download.

pub mod download;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use download::fetch_universe;
pub use provider::{
    DataError, DownloadProgress, PriceProvider, RawQuote, SilentProgress, StdoutProgress,
};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;
