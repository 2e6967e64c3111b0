use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::source::{QuoteSource, SeriesFuture, SourceError, SourceFactory};
use crate::throttling::RequestBudget;
use crate::{Bar, Resolution, Series, Symbol, TradingDate};

const TIME_SERIES_KEY: &str = "Time Series (Daily)";
const ERROR_KEY: &str = "Error Message";
const NOTICE_KEYS: [&str; 2] = ["Note", "Information"];

/// Alpha Vantage `TIME_SERIES_DAILY` adapter bound to one API key.
#[derive(Clone)]
pub struct AlphaVantageAdapter {
    http_client: Arc<dyn HttpClient>,
    api_key: String,
    base_url: String,
    timeout_ms: u64,
    budget: Option<RequestBudget>,
}

impl AlphaVantageAdapter {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()), api_key)
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        let config = ClientConfig::default();
        Self {
            http_client,
            api_key: api_key.into(),
            base_url: config.base_url,
            timeout_ms: config.timeout_ms,
            budget: config.quota.map(RequestBudget::new),
        }
    }

    pub fn from_config(
        http_client: Arc<dyn HttpClient>,
        api_key: impl Into<String>,
        config: &ClientConfig,
    ) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            base_url: config.base_url.clone(),
            timeout_ms: config.timeout_ms,
            budget: config.quota.map(RequestBudget::new),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    fn daily_series_request(&self, symbol: &Symbol, resolution: Resolution) -> HttpRequest {
        HttpRequest::get(&self.base_url)
            .with_query("function", "TIME_SERIES_DAILY")
            .with_query("symbol", symbol.as_str())
            .with_query("outputsize", resolution.output_size())
            .with_query("datatype", "json")
            .with_query("apikey", &self.api_key)
            .with_timeout_ms(self.timeout_ms)
    }

    async fn fetch_series(
        &self,
        symbol: &Symbol,
        resolution: Resolution,
    ) -> Result<Series, SourceError> {
        if let Some(Err(wait)) = self.budget.as_ref().map(RequestBudget::acquire) {
            return Err(SourceError::rate_limited(
                format!(
                    "alphavantage request budget exhausted; retry in {:.2}s",
                    wait.as_secs_f64()
                ),
                Some(wait),
            ));
        }

        let request = self.daily_series_request(symbol, resolution);
        tracing::debug!(url = %request.redacted_url(), "alphavantage request");

        let response = self.http_client.execute(request).await.map_err(|error| {
            SourceError::unavailable(format!("alphavantage transport error: {}", error.message()))
        })?;

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "alphavantage returned status {}: {}",
                response.status, response.body
            )));
        }

        let series = parse_daily_series(symbol, resolution, &response.body);
        if let Err(error) = &series {
            tracing::warn!(
                symbol = %symbol,
                %resolution,
                code = error.code(),
                "alphavantage response rejected"
            );
        }
        series
    }
}

impl std::fmt::Debug for AlphaVantageAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlphaVantageAdapter")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

impl QuoteSource for AlphaVantageAdapter {
    fn name(&self) -> &'static str {
        "alphavantage"
    }

    fn fetch_daily_series<'a>(
        &'a self,
        symbol: &'a Symbol,
        resolution: Resolution,
    ) -> SeriesFuture<'a> {
        Box::pin(self.fetch_series(symbol, resolution))
    }
}

/// Builds [`AlphaVantageAdapter`]s that share one transport and configuration.
#[derive(Clone)]
pub struct AlphaVantageFactory {
    http_client: Arc<dyn HttpClient>,
    config: ClientConfig,
}

impl AlphaVantageFactory {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()), config)
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, config: ClientConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }
}

impl SourceFactory for AlphaVantageFactory {
    type Source = AlphaVantageAdapter;

    fn build(&self, credential: &str) -> AlphaVantageAdapter {
        AlphaVantageAdapter::from_config(Arc::clone(&self.http_client), credential, &self.config)
    }
}

#[derive(Debug, Deserialize)]
struct DailyBarPayload {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

/// Converts a `TIME_SERIES_DAILY` body into a validated series.
pub fn parse_daily_series(
    symbol: &Symbol,
    resolution: Resolution,
    body: &str,
) -> Result<Series, SourceError> {
    let document: Value = serde_json::from_str(body).map_err(|error| {
        SourceError::malformed(format!("alphavantage response is not valid JSON: {error}"))
    })?;

    let Value::Object(mut fields) = document else {
        return Err(SourceError::malformed(format!(
            "unexpected alphavantage response format: {body}"
        )));
    };

    if let Some(message) = fields.get(ERROR_KEY) {
        return Err(SourceError::provider(format!(
            "alphavantage returned an error: {}",
            text_of(message)
        )));
    }

    let Some(time_series) = fields.remove(TIME_SERIES_KEY) else {
        if let Some(notice) = NOTICE_KEYS.iter().find_map(|key| fields.get(*key)) {
            return Err(SourceError::rate_limited(
                format!("alphavantage declined the request: {}", text_of(notice)),
                None,
            ));
        }
        return Err(SourceError::malformed(format!(
            "unexpected alphavantage response format: {body}"
        )));
    };

    let payload: BTreeMap<String, DailyBarPayload> = serde_json::from_value(time_series)
        .map_err(|error| SourceError::malformed(format!("invalid daily bar payload: {error}")))?;

    let bars = payload
        .into_iter()
        .map(|(date, bar)| normalize_bar(&date, bar))
        .collect::<Result<Vec<_>, _>>()?;

    Series::new(symbol.clone(), resolution, bars)
        .map_err(|error| SourceError::malformed(error.to_string()))
}

fn normalize_bar(date: &str, payload: DailyBarPayload) -> Result<Bar, SourceError> {
    let date = TradingDate::parse(date).map_err(|error| SourceError::malformed(error.to_string()))?;

    Bar::new(
        date,
        parse_price("open", &payload.open, date)?,
        parse_price("high", &payload.high, date)?,
        parse_price("low", &payload.low, date)?,
        parse_price("close", &payload.close, date)?,
        parse_volume(&payload.volume, date)?,
    )
    .map_err(|error| SourceError::malformed(format!("invalid bar for {date}: {error}")))
}

fn parse_price(field: &str, raw: &str, date: TradingDate) -> Result<f64, SourceError> {
    raw.trim().parse::<f64>().map_err(|_| {
        SourceError::malformed(format!("invalid {field} '{raw}' for {date}"))
    })
}

fn parse_volume(raw: &str, date: TradingDate) -> Result<u64, SourceError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<u64>()
        .or_else(|_| {
            // Some listings report volume as a whole-number decimal ("1200.0").
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite() && *value >= 0.0 && value.fract() == 0.0)
                .map(|value| value as u64)
                .ok_or(())
        })
        .map_err(|_| SourceError::malformed(format!("invalid volume '{raw}' for {date}")))
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
