//! CSV price files: one `{SYMBOL}.csv` per instrument with `date,close` columns.
//!
//! Also accepts the capitalized `Date,Close` header that spreadsheet exports use.
//! A close that does not parse as a number is kept as NaN so the engine reports
//! it instead of the provider silently dropping the row.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::provider::{check_range, DataError, DataSource, FetchResult, PriceProvider};
use crate::domain::{PricePoint, PriceSeries};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Date")]
    date: String,
    #[serde(alias = "Close", default)]
    close: String,
}

#[derive(Debug, Serialize)]
struct CsvRecord {
    date: NaiveDate,
    close: f64,
}

/// Reads price files from a directory.
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `symbol`.
    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }
}

impl PriceProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv_file"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        check_range(start, end)?;
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        let series = read_csv(&path)?
            .into_points()
            .into_iter()
            .filter(|p| p.date >= start && p.date <= end)
            .collect();

        Ok(FetchResult {
            symbol: symbol.to_string(),
            series,
            source: DataSource::CsvFile,
        })
    }

    fn is_available(&self) -> bool {
        self.dir.is_dir()
    }
}

/// Read every row of a price file, in file order.
pub fn read_csv(path: &Path) -> Result<PriceSeries, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .map_err(|e| DataError::Parse(format!("{}: {e}", path.display())))?;

    let mut points = Vec::new();
    for (i, row) in reader.deserialize::<CsvRow>().enumerate() {
        let row = row.map_err(|e| DataError::Parse(format!("{}: {e}", path.display())))?;
        // Accept both plain dates and timestamp-suffixed exports ("2024-01-02 00:00:00").
        let date_part = row.date.split_whitespace().next().unwrap_or_default();
        let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| {
            DataError::Parse(format!(
                "{} row {}: bad date '{}': {e}",
                path.display(),
                i + 2,
                row.date
            ))
        })?;
        let close = row.close.parse::<f64>().unwrap_or(f64::NAN);
        points.push(PricePoint::new(date, close));
    }

    Ok(PriceSeries::new(points))
}

/// Write a series in the format `CsvProvider` reads.
pub fn write_csv(path: &Path, series: &PriceSeries) -> Result<(), DataError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| DataError::Other(format!("{}: {e}", path.display())))?;
    for p in series {
        writer
            .serialize(CsvRecord {
                date: p.date,
                close: p.close,
            })
            .map_err(|e| DataError::Other(format!("{}: {e}", path.display())))?;
    }
    writer.flush()?;
    Ok(())
}
