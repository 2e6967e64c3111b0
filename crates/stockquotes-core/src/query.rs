//! Query results and the window extremum search.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::{Bar, Symbol, TradingDate};

/// One day's record for a symbol, as returned by `lookup`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarResult {
    pub symbol: Symbol,
    pub date: TradingDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl BarResult {
    pub fn from_bar(symbol: Symbol, bar: &Bar) -> Self {
        Self {
            symbol,
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        }
    }
}

/// Which extreme a window query looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extremum {
    /// Smallest `low`.
    Minimum,
    /// Largest `high`.
    Maximum,
}

impl Extremum {
    pub const fn price_field(self) -> &'static str {
        match self {
            Self::Minimum => "min_price",
            Self::Maximum => "max_price",
        }
    }

    pub fn price_of(self, bar: &Bar) -> f64 {
        match self {
            Self::Minimum => bar.low,
            Self::Maximum => bar.high,
        }
    }

    fn improves(self, candidate: f64, best: f64) -> bool {
        match self {
            Self::Minimum => candidate < best,
            Self::Maximum => candidate > best,
        }
    }

    /// First bar holding the extreme price.
    ///
    /// Bars are expected most recent first, so ties resolve to the latest date.
    pub fn find(self, bars: &[Bar]) -> Option<&Bar> {
        let (first, rest) = bars.split_first()?;
        let best = rest.iter().fold(first, |best, bar| {
            if self.improves(self.price_of(bar), self.price_of(best)) {
                bar
            } else {
                best
            }
        });
        Some(best)
    }
}

/// Result of `minimum_over_window` / `maximum_over_window`.
///
/// Serialises the price under `min_price` or `max_price` depending on
/// [`Extremum`]. `period` reports the bars actually considered, which is
/// smaller than `requested` when the series is shorter than the window.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtremumResult {
    pub symbol: Symbol,
    pub extremum: Extremum,
    pub price: f64,
    pub date: TradingDate,
    pub requested: usize,
    pub considered: usize,
}

impl ExtremumResult {
    pub fn period(&self) -> String {
        format!("last {} trading days", self.considered)
    }
}

impl Serialize for ExtremumResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("ExtremumResult", 6)?;
        state.serialize_field("symbol", &self.symbol)?;
        state.serialize_field(self.extremum.price_field(), &self.price)?;
        state.serialize_field("date", &self.date)?;
        state.serialize_field("period", &self.period())?;
        state.serialize_field("requested", &self.requested)?;
        state.serialize_field("considered", &self.considered)?;
        state.end()
    }
}
