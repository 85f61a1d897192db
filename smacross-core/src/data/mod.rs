//! Price data providers and series canonicalization.
//!
//! Providers are the engine's input boundary. They fetch a closed date range
//! for one symbol; `canonicalize` then guarantees the ascending, duplicate-free
//! order the engine assumes.

pub mod canonicalize;
pub mod csv_file;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use canonicalize::{canonicalize, CanonicalSeries};
pub use csv_file::{write_csv, CsvProvider};
pub use provider::{DataError, DataSource, FetchResult, PriceProvider};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;
