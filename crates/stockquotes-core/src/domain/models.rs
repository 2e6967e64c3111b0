use serde::{Deserialize, Serialize};

use crate::{Resolution, Symbol, TradingDate, ValidationError};

/// One trading day's OHLCV record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: TradingDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    pub fn new(
        date: TradingDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Result<Self, ValidationError> {
        validate_positive("open", open)?;
        validate_positive("high", high)?;
        validate_positive("low", low)?;
        validate_positive("close", close)?;

        if high < low {
            return Err(ValidationError::InvalidBarRange);
        }

        Ok(Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

/// Daily bars for one symbol at one resolution, most recent first.
///
/// Dates are strictly decreasing: `bars[i].date > bars[i + 1].date`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    symbol: Symbol,
    resolution: Resolution,
    bars: Vec<Bar>,
}

impl Series {
    /// Sorts `bars` newest first and rejects repeated trading days.
    pub fn new(
        symbol: Symbol,
        resolution: Resolution,
        mut bars: Vec<Bar>,
    ) -> Result<Self, ValidationError> {
        bars.sort_by(|left, right| right.date.cmp(&left.date));

        if let Some(pair) = bars.windows(2).find(|pair| pair[0].date == pair[1].date) {
            return Err(ValidationError::DuplicateDate {
                date: pair[0].date.to_string(),
            });
        }

        Ok(Self {
            symbol,
            resolution,
            bars,
        })
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub const fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn latest(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn earliest(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn get(&self, date: TradingDate) -> Option<&Bar> {
        self.bars
            .binary_search_by(|bar| date.cmp(&bar.date))
            .ok()
            .map(|index| &self.bars[index])
    }

    /// The `size` most recent bars, or all of them when the series is shorter.
    pub fn window(&self, size: usize) -> &[Bar] {
        &self.bars[..size.min(self.bars.len())]
    }
}

fn validate_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value <= 0.0 {
        return Err(ValidationError::NonPositiveValue { field });
    }
    Ok(())
}
