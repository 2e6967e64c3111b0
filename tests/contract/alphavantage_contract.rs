//! Wire contract of the Alpha Vantage adapter against a recording transport.

#[path = "../support/mod.rs"]
mod support;

use std::sync::Arc;
use std::time::Duration;

use stockquotes_core::{
    AlphaVantageAdapter, ClientConfig, HttpClient, HttpError, HttpResponse, QueryEngine,
    QueryError, QuotaPolicy, QuoteSource, Resolution, SourceErrorKind, Symbol,
};
use support::{RecordingHttpClient, AAPL_DAILY};

fn aapl() -> Symbol {
    Symbol::parse("aapl").expect("valid symbol")
}

fn adapter(http: &Arc<RecordingHttpClient>) -> AlphaVantageAdapter {
    AlphaVantageAdapter::with_http_client(Arc::clone(http) as Arc<dyn HttpClient>, "test-key")
}

#[tokio::test]
async fn daily_request_carries_every_query_parameter() {
    let http = Arc::new(RecordingHttpClient::replying(AAPL_DAILY));

    adapter(&http)
        .fetch_daily_series(&aapl(), Resolution::Recent)
        .await
        .expect("valid body");

    let requests = http.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.base_url, "https://www.alphavantage.co/query");
    assert_eq!(request.query_value("function"), Some("TIME_SERIES_DAILY"));
    assert_eq!(request.query_value("symbol"), Some("AAPL"));
    assert_eq!(request.query_value("outputsize"), Some("compact"));
    assert_eq!(request.query_value("datatype"), Some("json"));
    assert_eq!(request.query_value("apikey"), Some("test-key"));
    assert_eq!(request.timeout_ms, 10_000);
}

#[tokio::test]
async fn full_resolution_requests_full_output_size() {
    let http = Arc::new(RecordingHttpClient::replying(AAPL_DAILY));

    let series = adapter(&http)
        .fetch_daily_series(&aapl(), Resolution::Full)
        .await
        .expect("valid body");

    assert_eq!(series.resolution(), Resolution::Full);
    assert_eq!(http.requests()[0].query_value("outputsize"), Some("full"));
}

#[tokio::test]
async fn configured_base_url_and_timeout_are_used() {
    let http = Arc::new(RecordingHttpClient::replying(AAPL_DAILY));
    let config = ClientConfig::default()
        .with_base_url("http://127.0.0.1:8080/query")
        .with_timeout_ms(1_500);
    let adapter =
        AlphaVantageAdapter::from_config(Arc::clone(&http) as Arc<dyn HttpClient>, "k", &config);

    adapter
        .fetch_daily_series(&aapl(), Resolution::Recent)
        .await
        .expect("valid body");

    let request = &http.requests()[0];
    assert_eq!(request.base_url, "http://127.0.0.1:8080/query");
    assert_eq!(request.timeout_ms, 1_500);
}

#[tokio::test]
async fn bars_are_normalized_and_sorted_most_recent_first() {
    let http = Arc::new(RecordingHttpClient::replying(AAPL_DAILY));

    let series = adapter(&http)
        .fetch_daily_series(&aapl(), Resolution::Recent)
        .await
        .expect("valid body");

    let dates: Vec<String> = series.bars().iter().map(|bar| bar.date.to_string()).collect();
    assert_eq!(dates, ["2025-03-28", "2025-03-27", "2025-03-26"]);

    let latest = series.latest().expect("non-empty");
    assert_eq!(latest.open, 221.67);
    assert_eq!(latest.high, 223.81);
    assert_eq!(latest.low, 217.68);
    assert_eq!(latest.close, 217.90);
    assert_eq!(latest.volume, 39_818_617);
}

#[tokio::test]
async fn transport_failure_is_unavailable() {
    let http = Arc::new(RecordingHttpClient::failing(HttpError::timeout(
        "request timeout",
    )));

    let err = adapter(&http)
        .fetch_daily_series(&aapl(), Resolution::Recent)
        .await
        .expect_err("transport down");

    assert_eq!(err.kind(), SourceErrorKind::Unavailable);
    assert_eq!(err.code(), "source.unavailable");
    assert!(err.message().contains("request timeout"));
}

#[tokio::test]
async fn non_success_status_is_unavailable_with_status_and_body() {
    let http = Arc::new(RecordingHttpClient::scripted(
        Vec::new(),
        Ok(HttpResponse::with_status(503, "Service Unavailable")),
    ));

    let err = adapter(&http)
        .fetch_daily_series(&aapl(), Resolution::Recent)
        .await
        .expect_err("bad status");

    assert_eq!(err.kind(), SourceErrorKind::Unavailable);
    assert!(err.message().contains("503"));
    assert!(err.message().contains("Service Unavailable"));
}

#[tokio::test]
async fn provider_error_message_is_carried_verbatim() {
    let body = r#"{"Error Message": "Invalid API call. Please retry or visit the documentation (https://www.alphavantage.co/documentation/) for TIME_SERIES_DAILY."}"#;
    let http = Arc::new(RecordingHttpClient::replying(body));

    let err = adapter(&http)
        .fetch_daily_series(&aapl(), Resolution::Recent)
        .await
        .expect_err("provider error");

    assert_eq!(err.kind(), SourceErrorKind::Provider);
    assert!(err.message().contains("Invalid API call"));
}

#[tokio::test]
async fn premium_or_throttle_notice_is_rate_limited() {
    let body = r#"{"Information": "We have detected your API key as test-key and our standard API rate limit is 25 requests per day."}"#;
    let http = Arc::new(RecordingHttpClient::replying(body));

    let err = adapter(&http)
        .fetch_daily_series(&aapl(), Resolution::Full)
        .await
        .expect_err("throttled");

    assert_eq!(err.kind(), SourceErrorKind::RateLimited);
    assert!(err.retry_after().is_none());
}

#[tokio::test]
async fn unrecognized_shape_is_malformed() {
    let http = Arc::new(RecordingHttpClient::replying(r#"{"Meta Data": {}}"#));

    let err = adapter(&http)
        .fetch_daily_series(&aapl(), Resolution::Recent)
        .await
        .expect_err("no time series");

    assert_eq!(err.kind(), SourceErrorKind::MalformedResponse);
}

#[tokio::test]
async fn exhausted_budget_fails_fast_without_calling_the_provider() {
    let http = Arc::new(RecordingHttpClient::replying(AAPL_DAILY));
    let config = ClientConfig::default().with_quota(QuotaPolicy::alphavantage_free_tier());
    let adapter =
        AlphaVantageAdapter::from_config(Arc::clone(&http) as Arc<dyn HttpClient>, "k", &config);

    for _ in 0..5 {
        adapter
            .fetch_daily_series(&aapl(), Resolution::Recent)
            .await
            .expect("within budget");
    }
    let err = adapter
        .fetch_daily_series(&aapl(), Resolution::Recent)
        .await
        .expect_err("budget exhausted");

    assert_eq!(err.kind(), SourceErrorKind::RateLimited);
    let wait = err.retry_after().expect("retry hint");
    assert!(wait > Duration::ZERO && wait <= Duration::from_secs(60));
    assert_eq!(http.requests().len(), 5);
}

#[tokio::test]
async fn default_config_sends_every_request_to_the_transport() {
    let http = Arc::new(RecordingHttpClient::replying(AAPL_DAILY));
    let adapter = AlphaVantageAdapter::from_config(
        Arc::clone(&http) as Arc<dyn HttpClient>,
        "k",
        &ClientConfig::default(),
    );

    for _ in 0..8 {
        adapter
            .fetch_daily_series(&aapl(), Resolution::Full)
            .await
            .expect("no client-side limit");
    }

    assert_eq!(http.requests().len(), 8);
}

#[tokio::test]
async fn missed_lookups_across_symbols_are_not_throttled_by_default() {
    let http = Arc::new(RecordingHttpClient::replying(AAPL_DAILY));
    let engine = QueryEngine::new(adapter(&http));

    for symbol in ["AAPL", "MSFT", "IBM", "TSCO.LON"] {
        let err = engine
            .lookup(symbol, "2020-01-02")
            .await
            .expect_err("date outside the fixture");
        assert!(
            matches!(err, QueryError::DateNotFound { .. }),
            "{symbol}: unexpected {err:?}"
        );
    }

    assert_eq!(http.requests().len(), 8);
}

#[tokio::test]
async fn digit_leading_exchange_symbol_reaches_the_provider() {
    let http = Arc::new(RecordingHttpClient::replying(AAPL_DAILY));
    let engine = QueryEngine::new(adapter(&http));

    let bar = engine
        .lookup("600104.shh", "2025-03-28")
        .await
        .expect("bar on a listed date");

    assert_eq!(bar.symbol.as_str(), "600104.SHH");
    let requests = http.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query_value("symbol"), Some("600104.SHH"));
}

#[tokio::test]
async fn custom_quota_is_honored() {
    let http = Arc::new(RecordingHttpClient::replying(AAPL_DAILY));
    let config = ClientConfig::default().with_quota(QuotaPolicy {
        window: Duration::from_secs(60),
        limit: 1,
    });
    let adapter =
        AlphaVantageAdapter::from_config(Arc::clone(&http) as Arc<dyn HttpClient>, "k", &config);

    adapter
        .fetch_daily_series(&aapl(), Resolution::Recent)
        .await
        .expect("first request");
    let err = adapter
        .fetch_daily_series(&aapl(), Resolution::Full)
        .await
        .expect_err("second request");

    assert_eq!(err.kind(), SourceErrorKind::RateLimited);
    assert_eq!(http.requests().len(), 1);
}
