use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Number of trading days in a [`Resolution::Recent`] series.
pub const RECENT_WINDOW: usize = 100;

/// Span of history requested from the quote provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// The most recent [`RECENT_WINDOW`] trading days.
    Recent,
    /// Entire available history.
    Full,
}

impl Resolution {
    /// Smallest resolution guaranteed to hold `window` trailing bars.
    pub const fn for_window(window: usize) -> Self {
        if window <= RECENT_WINDOW {
            Self::Recent
        } else {
            Self::Full
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recent => "recent",
            Self::Full => "full",
        }
    }

    /// Value of the provider's `outputsize` parameter.
    pub const fn output_size(self) -> &'static str {
        match self {
            Self::Recent => "compact",
            Self::Full => "full",
        }
    }
}

impl Display for Resolution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "recent" | "compact" => Ok(Self::Recent),
            "full" => Ok(Self::Full),
            other => Err(ValidationError::InvalidResolution {
                value: other.to_owned(),
            }),
        }
    }
}
