//! Yahoo Finance price provider.
//!
//! Fetches daily closes from Yahoo's v8 chart API with retries and exponential
//! backoff. Yahoo has no official API and changes its format without notice;
//! the CSV provider is the offline fallback.

use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::provider::{check_range, DataError, DataSource, FetchResult, PriceProvider};
use crate::domain::{PricePoint, PriceSeries};

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

/// Yahoo Finance price provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    max_retries: u32,
    base_delay: Duration,
    use_adjusted: bool,
}

impl YahooProvider {
    pub fn new() -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            use_adjusted: true,
        })
    }

    pub fn with_retries(mut self, max_retries: u32, base_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.base_delay = base_delay;
        self
    }

    /// Use the raw close instead of the split/dividend-adjusted close.
    pub fn with_raw_close(mut self) -> Self {
        self.use_adjusted = false;
        self
    }

    /// Chart API URL for a symbol and an inclusive date range.
    fn chart_url(symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = midnight_utc(start);
        let end_ts = midnight_utc(end + chrono::Duration::days(1));
        format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{symbol}\
             ?period1={start_ts}&period2={end_ts}&interval=1d\
             &includeAdjustedClose=true"
        )
    }

    /// Execute the request with retries on transient failures.
    fn fetch_with_retry(&self, symbol: &str, url: &str) -> Result<String, DataError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                warn!(symbol, attempt, ?delay, "retrying Yahoo request");
                std::thread::sleep(delay);
            }

            let resp = match self.client.get(url).send() {
                Ok(resp) => resp,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    last_error = Some(DataError::NetworkUnreachable(e.to_string()));
                    continue;
                }
                Err(e) => return Err(DataError::NetworkUnreachable(e.to_string())),
            };

            let status = resp.status();
            debug!(symbol, %status, "Yahoo response");

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                let retry_after = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                last_error = Some(DataError::RateLimited {
                    retry_after_secs: retry_after,
                });
                continue;
            }

            if status == reqwest::StatusCode::UNAUTHORIZED
                || status == reqwest::StatusCode::FORBIDDEN
            {
                return Err(DataError::AuthenticationRequired(format!(
                    "Yahoo Finance refused the request (HTTP {status})"
                )));
            }

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                });
            }

            if status.is_server_error() {
                last_error = Some(DataError::Other(format!("HTTP {status} for {symbol}")));
                continue;
            }

            if !status.is_success() {
                return Err(DataError::Other(format!("HTTP {status} for {symbol}")));
            }

            return resp.text().map_err(|e| {
                DataError::ResponseFormatChanged(format!("failed to read body for {symbol}: {e}"))
            });
        }

        Err(last_error.unwrap_or_else(|| DataError::Other("max retries exceeded".into())))
    }
}

impl PriceProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        check_range(start, end)?;
        let url = Self::chart_url(symbol, start, end);
        let body = self.fetch_with_retry(symbol, &url)?;
        let series = parse_chart_json(symbol, &body, self.use_adjusted)?;
        // Yahoo can return a trailing row past period2; keep the closed range.
        let series = series
            .into_points()
            .into_iter()
            .filter(|p| p.date >= start && p.date <= end)
            .collect();

        Ok(FetchResult {
            symbol: symbol.to_string(),
            series,
            source: DataSource::YahooFinance,
        })
    }
}

fn midnight_utc(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

/// Parse a chart API body into a price series.
///
/// Rows where every field is null are non-trading days and are skipped. A row
/// with data but no close keeps its date with a NaN close. When adjusted closes
/// are in use, a missing adjusted value is NaN even if the raw close exists.
pub(crate) fn parse_chart_json(
    symbol: &str,
    body: &str,
    use_adjusted: bool,
) -> Result<PriceSeries, DataError> {
    let resp: ChartResponse = serde_json::from_str(body).map_err(|e| {
        DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
    })?;

    let result = resp.chart.result.ok_or_else(|| match resp.chart.error {
        Some(err) if err.code == "Not Found" => DataError::SymbolNotFound {
            symbol: symbol.to_string(),
        },
        Some(err) => DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description)),
        None => DataError::ResponseFormatChanged("empty result with no error".into()),
    })?;

    let data = result
        .into_iter()
        .next()
        .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

    // No timestamps means no trading days in the range.
    let timestamps = data.timestamp.unwrap_or_default();

    let quote = data.indicators.quote.into_iter().next().unwrap_or_default();

    let adj_closes = data
        .indicators
        .adjclose
        .and_then(|v| v.into_iter().next())
        .map(|a| a.adjclose)
        .filter(|_| use_adjusted);

    let mut points = Vec::with_capacity(timestamps.len());

    for (i, &ts) in timestamps.iter().enumerate() {
        let date = chrono::DateTime::from_timestamp(ts, 0)
            .map(|dt| dt.naive_utc().date())
            .ok_or_else(|| DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}")))?;

        let field = |v: &Vec<Option<f64>>| v.get(i).copied().flatten();
        let close = field(&quote.close);
        let adj_close = adj_closes.as_ref().and_then(field);

        if close.is_none()
            && adj_close.is_none()
            && field(&quote.open).is_none()
            && field(&quote.high).is_none()
            && field(&quote.low).is_none()
            && field(&quote.volume).is_none()
        {
            continue;
        }

        // Never fill an adjusted gap with a raw close: the scales differ.
        let value = match adj_closes {
            Some(_) => adj_close,
            None => close,
        };
        points.push(PricePoint::new(date, value.unwrap_or(f64::NAN)));
    }

    Ok(PriceSeries::new(points))
}
