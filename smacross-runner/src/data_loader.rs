//! Price loading and data resolution for the runner.
//!
//! Given a symbol and a date range, fetches closes from the configured provider
//! and returns a canonical series plus its provenance. Fallback policy:
//! 1. Fetch from the provider → canonicalize → hash
//! 2. If the fetch fails and `synthetic_fallback` is set → generate synthetic
//!    prices (tagged `DataSource::Synthetic`)
//! 3. Otherwise → fail with the provider's error
//!
//! An empty fetch is not an error here; the engine reports it.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info, warn};

use smacross_core::data::{
    canonicalize, CsvProvider, DataError, DataSource, PriceProvider, SyntheticProvider,
    YahooProvider,
};
use smacross_core::domain::PriceSeries;

use crate::config::{DataSection, SourceKind};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to load '{symbol}' from {provider}: {source}")]
    Fetch {
        symbol: String,
        provider: String,
        #[source]
        source: DataError,
    },

    #[error("data error: {0}")]
    Data(#[from] DataError),
}

impl LoadError {
    /// The provider error underneath, if any.
    pub fn data_error(&self) -> &DataError {
        match self {
            LoadError::Fetch { source, .. } => source,
            LoadError::Data(e) => e,
        }
    }
}

/// Options controlling how prices are loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// First date requested (inclusive).
    pub start: NaiveDate,
    /// Last date requested (inclusive).
    pub end: NaiveDate,
    /// Generate synthetic prices when the provider fails.
    pub synthetic_fallback: bool,
}

impl LoadOptions {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            synthetic_fallback: false,
        }
    }
}

/// A canonical series and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSeries {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub series: PriceSeries,
    pub source: DataSource,
    /// BLAKE3 over symbol, dates and closes.
    pub dataset_hash: String,
    pub duplicates_removed: usize,
    pub was_reordered: bool,
}

impl LoadedSeries {
    /// Wrap an in-memory series, canonicalizing and hashing it.
    pub fn from_series(
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        series: PriceSeries,
        source: DataSource,
    ) -> Self {
        let canonical = canonicalize(series);
        if canonical.duplicates_removed > 0 || canonical.was_reordered {
            warn!(
                symbol,
                duplicates_removed = canonical.duplicates_removed,
                reordered = canonical.was_reordered,
                "provider returned non-canonical prices"
            );
        }
        let dataset_hash = compute_dataset_hash(symbol, &canonical.series);
        Self {
            symbol: symbol.to_string(),
            start,
            end,
            series: canonical.series,
            source,
            dataset_hash,
            duplicates_removed: canonical.duplicates_removed,
            was_reordered: canonical.was_reordered,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.source == DataSource::Synthetic
    }
}

/// Build the provider selected by the `[data]` config table.
pub fn make_provider(data: &DataSection) -> Result<Box<dyn PriceProvider>, LoadError> {
    let provider: Box<dyn PriceProvider> = match data.source {
        SourceKind::Yahoo => Box::new(YahooProvider::new()?),
        SourceKind::Csv => Box::new(CsvProvider::new(&data.csv_dir)),
        SourceKind::Synthetic => Box::new(SyntheticProvider::default()),
    };
    Ok(provider)
}

/// Load one symbol from `provider`, with optional synthetic fallback.
pub fn load_series(
    symbol: &str,
    provider: &dyn PriceProvider,
    opts: &LoadOptions,
) -> Result<LoadedSeries, LoadError> {
    let fetched = if provider.is_available() {
        provider.fetch(symbol, opts.start, opts.end)
    } else {
        Err(DataError::Other(format!("provider {} is unavailable", provider.name())))
    };

    match fetched {
        Ok(result) => {
            info!(
                symbol,
                provider = provider.name(),
                points = result.series.len(),
                "loaded prices"
            );
            Ok(LoadedSeries::from_series(
                symbol,
                opts.start,
                opts.end,
                result.series,
                result.source,
            ))
        }
        Err(DataError::InvalidRange { start, end }) => {
            Err(LoadError::Data(DataError::InvalidRange { start, end }))
        }
        Err(source) if opts.synthetic_fallback => {
            warn!(
                symbol,
                provider = provider.name(),
                error = %source,
                "provider failed; generating synthetic prices, results will be tagged synthetic"
            );
            let series = SyntheticProvider::default().generate(symbol, opts.start, opts.end);
            Ok(LoadedSeries::from_series(
                symbol,
                opts.start,
                opts.end,
                series,
                DataSource::Synthetic,
            ))
        }
        Err(source) => Err(LoadError::Fetch {
            symbol: symbol.to_string(),
            provider: provider.name().to_string(),
            source,
        }),
    }
}

/// Deterministic BLAKE3 hash over a symbol's dates and closes.
pub fn compute_dataset_hash(symbol: &str, series: &PriceSeries) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(symbol.as_bytes());
    for point in series {
        hasher.update(point.date.to_string().as_bytes());
        hasher.update(&point.close.to_le_bytes());
    }
    let hash = hasher.finalize().to_hex().to_string();
    debug!(symbol, points = series.len(), %hash, "dataset hash");
    hash
}
