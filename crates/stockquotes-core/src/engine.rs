//! Series cache and query engine.
//!
//! ```text
//! lookup:  NoCache ─fetch Recent─▶ RecentCached ─date found─▶ result
//!                                       │ missing
//!                                       ▼
//!                                 ─fetch Full─▶ FullCached ─date found─▶ result
//!                                                    │ missing
//!                                                    ▼
//!                                               DateNotFound
//! ```
//!
//! Window queries pick [`Resolution::for_window`] and never escalate.

use std::sync::Arc;

use crate::cache::{CacheOutcome, CachePolicy, SeriesCache};
use crate::query::{BarResult, Extremum, ExtremumResult};
use crate::source::QuoteSource;
use crate::{QueryError, Resolution, Series, Symbol, TradingDate, ValidationError};

/// Answers lookups and window queries from one quote source and one cache.
#[derive(Debug)]
pub struct QueryEngine<S> {
    source: S,
    cache: SeriesCache,
}

impl<S: QuoteSource> QueryEngine<S> {
    /// Engine whose cache never expires entries.
    pub fn new(source: S) -> Self {
        Self::with_cache(source, SeriesCache::new())
    }

    pub fn with_cache_policy(source: S, policy: Arc<dyn CachePolicy>) -> Self {
        Self::with_cache(source, SeriesCache::with_policy(policy))
    }

    pub fn with_cache(source: S, cache: SeriesCache) -> Self {
        Self { source, cache }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn cache(&self) -> &SeriesCache {
        &self.cache
    }

    /// Bar for `symbol` on `date` (`YYYY-MM-DD`).
    ///
    /// Tries the recent window first and only fetches full history when the
    /// date is not in it.
    pub async fn lookup(&self, symbol: &str, date: &str) -> Result<BarResult, QueryError> {
        let symbol = Symbol::parse(symbol)?;
        let date = TradingDate::parse(date)?;
        self.bar_on(symbol, date).await
    }

    pub(crate) async fn bar_on(
        &self,
        symbol: Symbol,
        date: TradingDate,
    ) -> Result<BarResult, QueryError> {
        let recent = self.series(&symbol, Resolution::Recent).await?;
        if let Some(bar) = recent.get(date) {
            return Ok(BarResult::from_bar(symbol, bar));
        }

        tracing::info!(
            symbol = %symbol,
            %date,
            "date not in recent window, trying full history"
        );
        let full = self.series(&symbol, Resolution::Full).await?;
        full.get(date)
            .map(|bar| BarResult::from_bar(symbol.clone(), bar))
            .ok_or_else(|| QueryError::DateNotFound {
                symbol: symbol.to_string(),
                date: date.to_string(),
            })
    }

    /// Lowest `low` over the `window` most recent trading days.
    pub async fn minimum_over_window(
        &self,
        symbol: &str,
        window: usize,
    ) -> Result<ExtremumResult, QueryError> {
        let symbol = parse_window_query(symbol, window)?;
        self.extremum_over_window(symbol, window, Extremum::Minimum)
            .await
    }

    /// Highest `high` over the `window` most recent trading days.
    pub async fn maximum_over_window(
        &self,
        symbol: &str,
        window: usize,
    ) -> Result<ExtremumResult, QueryError> {
        let symbol = parse_window_query(symbol, window)?;
        self.extremum_over_window(symbol, window, Extremum::Maximum)
            .await
    }

    /// `window` must already be checked by [`parse_window_query`].
    pub(crate) async fn extremum_over_window(
        &self,
        symbol: Symbol,
        window: usize,
        extremum: Extremum,
    ) -> Result<ExtremumResult, QueryError> {
        let series = self.series(&symbol, Resolution::for_window(window)).await?;
        let bars = series.window(window);
        let bar = extremum
            .find(bars)
            .ok_or_else(|| QueryError::EmptySeries {
                symbol: symbol.to_string(),
            })?;

        Ok(ExtremumResult {
            price: extremum.price_of(bar),
            date: bar.date,
            symbol,
            extremum,
            requested: window,
            considered: bars.len(),
        })
    }

    async fn series(
        &self,
        symbol: &Symbol,
        resolution: Resolution,
    ) -> Result<Arc<Series>, QueryError> {
        let (series, outcome) = self
            .cache
            .get_or_fetch(symbol, resolution, || {
                tracing::info!(
                    source = self.source.name(),
                    symbol = %symbol,
                    %resolution,
                    "fetching daily series"
                );
                self.source.fetch_daily_series(symbol, resolution)
            })
            .await
            .map_err(|source| QueryError::Source {
                symbol: symbol.to_string(),
                source,
            })?;

        if outcome == CacheOutcome::Hit {
            tracing::debug!(symbol = %symbol, %resolution, "using cached series");
        }
        Ok(series)
    }
}

/// Validates the arguments of a window query without touching any source.
pub(crate) fn parse_window_query(symbol: &str, window: usize) -> Result<Symbol, QueryError> {
    let symbol = Symbol::parse(symbol)?;
    if window == 0 {
        return Err(ValidationError::EmptyWindow.into());
    }
    Ok(symbol)
}
