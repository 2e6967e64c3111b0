//! Shared fakes for integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use stockquotes_core::{HttpClient, HttpError, HttpRequest, HttpResponse};

pub const AAPL_DAILY: &str = r#"{
    "Meta Data": {
        "1. Information": "Daily Prices (open, high, low, close) and Volumes",
        "2. Symbol": "AAPL",
        "3. Last Refreshed": "2025-03-28",
        "4. Output Size": "Compact",
        "5. Time Zone": "US/Eastern"
    },
    "Time Series (Daily)": {
        "2025-03-28": {"1. open": "221.6700", "2. high": "223.8100", "3. low": "217.6800", "4. close": "217.9000", "5. volume": "39818617"},
        "2025-03-27": {"1. open": "221.3900", "2. high": "224.9900", "3. low": "220.5601", "4. close": "223.8500", "5. volume": "37094774"},
        "2025-03-26": {"1. open": "223.5100", "2. high": "225.0200", "3. low": "220.4700", "4. close": "221.5300", "5. volume": "34532656"}
    }
}"#;

/// HTTP client that records every request and replays scripted responses.
///
/// Once the script runs out, the last response is repeated.
pub struct RecordingHttpClient {
    requests: Mutex<Vec<HttpRequest>>,
    responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    fallback: Result<HttpResponse, HttpError>,
}

impl RecordingHttpClient {
    pub fn replying(body: &str) -> Self {
        Self::scripted(Vec::new(), Ok(HttpResponse::ok_json(body)))
    }

    pub fn failing(error: HttpError) -> Self {
        Self::scripted(Vec::new(), Err(error))
    }

    pub fn scripted(
        responses: Vec<Result<HttpResponse, HttpError>>,
        fallback: Result<HttpResponse, HttpError>,
    ) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            responses: Mutex::new(responses.into()),
            fallback,
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn api_keys(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter_map(|request| request.query_value("apikey").map(str::to_owned))
            .collect()
    }
}

impl HttpClient for RecordingHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.requests.lock().expect("requests lock").push(request);
        let response = self
            .responses
            .lock()
            .expect("responses lock")
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        Box::pin(async move { response })
    }
}
