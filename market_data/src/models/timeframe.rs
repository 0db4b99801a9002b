use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeFrameError {
    #[error("Invalid amount for {:?}: {}", unit, message)]
    InvalidAmount {
        unit: TimeFrameUnit,
        message: String,
    },

    #[error("Invalid input: {}", message)]
    InvalidInput { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeFrameUnit {
    Day,
    Week,
    Month,
}

/// Interval between consecutive records of a series (amount × unit).
///
/// Validation of allowed combinations is left to each data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeFrame {
    pub amount: u32,
    pub unit: TimeFrameUnit,
}

impl TimeFrame {
    pub fn new(amount: u32, unit: TimeFrameUnit) -> Self {
        Self { amount, unit }
    }

    pub fn day() -> Self {
        Self::new(1, TimeFrameUnit::Day)
    }

    pub fn week() -> Self {
        Self::new(1, TimeFrameUnit::Week)
    }

    pub fn month() -> Self {
        Self::new(1, TimeFrameUnit::Month)
    }
}

impl Default for TimeFrame {
    fn default() -> Self {
        Self::day()
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.unit {
            TimeFrameUnit::Day => "d",
            TimeFrameUnit::Week => "wk",
            TimeFrameUnit::Month => "mo",
        };
        write!(f, "{}{}", self.amount, unit)
    }
}

/// Parses compact forms such as `1d`, `1wk`, `3mo`, or a bare unit (`day`).
impl FromStr for TimeFrame {
    type Err = TimeFrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let (digits, unit) = s.split_at(split);

        let amount = if digits.is_empty() {
            1
        } else {
            digits.parse::<u32>().map_err(|e| TimeFrameError::InvalidInput {
                message: format!("{s}: {e}"),
            })?
        };

        let unit = match unit.to_lowercase().as_str() {
            "d" | "day" | "days" => TimeFrameUnit::Day,
            "w" | "wk" | "week" | "weeks" => TimeFrameUnit::Week,
            "mo" | "month" | "months" => TimeFrameUnit::Month,
            _ => {
                return Err(TimeFrameError::InvalidInput {
                    message: format!("Invalid timeframe unit: {s}"),
                });
            }
        };

        if amount == 0 {
            return Err(TimeFrameError::InvalidAmount {
                unit,
                message: "amount must be at least 1".into(),
            });
        }

        Ok(Self::new(amount, unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timeframe() {
        assert_eq!("1d".parse::<TimeFrame>().unwrap(), TimeFrame::day());
        assert_eq!("1wk".parse::<TimeFrame>().unwrap(), TimeFrame::week());
        assert_eq!(
            "3mo".parse::<TimeFrame>().unwrap(),
            TimeFrame::new(3, TimeFrameUnit::Month)
        );
        assert_eq!("day".parse::<TimeFrame>().unwrap(), TimeFrame::day());

        assert!("5x".parse::<TimeFrame>().is_err());
        assert!(matches!(
            "0d".parse::<TimeFrame>(),
            Err(TimeFrameError::InvalidAmount {
                unit: TimeFrameUnit::Day,
                ..
            })
        ));
    }

    #[test]
    fn test_display_matches_parse() {
        for tf in [TimeFrame::day(), TimeFrame::week(), TimeFrame::new(3, TimeFrameUnit::Month)] {
            assert_eq!(tf.to_string().parse::<TimeFrame>().unwrap(), tf);
        }
    }
}
