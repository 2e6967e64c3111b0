//! Quote source contract and its error type.
//!
//! A [`QuoteSource`] turns `(symbol, resolution)` into a validated
//! [`Series`]. It performs no caching; the [`QueryEngine`](crate::QueryEngine)
//! sits above it and owns the cache.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::{Resolution, Series, Symbol};

/// Boxed future returned by [`QuoteSource::fetch_daily_series`].
pub type SeriesFuture<'a> = Pin<Box<dyn Future<Output = Result<Series, SourceError>> + Send + 'a>>;

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Transport failure or non-success HTTP status.
    Unavailable,
    /// Client-side budget exhausted or the provider reported throttling.
    RateLimited,
    /// The provider answered with an explicit error message.
    Provider,
    /// The response did not have the expected shape.
    MalformedResponse,
}

/// Failure to obtain a series from the quote provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retry_after: Option<Duration>,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retry_after: None,
        }
    }

    pub fn rate_limited(message: impl Into<String>, retry_after: Option<Duration>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retry_after,
        }
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Provider,
            message: message.into(),
            retry_after: None,
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::MalformedResponse,
            message: message.into(),
            retry_after: None,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Earliest time a repeat request could succeed, when known.
    pub const fn retry_after(&self) -> Option<Duration> {
        self.retry_after
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::Provider => "source.provider",
            SourceErrorKind::MalformedResponse => "source.malformed_response",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Remote provider of daily bar series.
///
/// Implementations must return bars sorted most recent first with unique
/// dates, which [`Series::new`] guarantees. A failed call must not return a
/// partial series.
pub trait QuoteSource: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &'static str;

    fn fetch_daily_series<'a>(
        &'a self,
        symbol: &'a Symbol,
        resolution: Resolution,
    ) -> SeriesFuture<'a>;
}

impl<S: QuoteSource + ?Sized> QuoteSource for Arc<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn fetch_daily_series<'a>(
        &'a self,
        symbol: &'a Symbol,
        resolution: Resolution,
    ) -> SeriesFuture<'a> {
        (**self).fetch_daily_series(symbol, resolution)
    }
}

/// Builds a [`QuoteSource`] bound to one credential.
pub trait SourceFactory: Send + Sync {
    type Source: QuoteSource;

    fn build(&self, credential: &str) -> Self::Source;
}

impl<F, S> SourceFactory for F
where
    F: Fn(&str) -> S + Send + Sync,
    S: QuoteSource,
{
    type Source = S;

    fn build(&self, credential: &str) -> S {
        self(credential)
    }
}
