//! Trading calendar provider — the simulator never knows about holidays.
//!
//! The engine consumes an ordered list of valid trading days; where that
//! list comes from (exchange calendar service, cached file, test fixture)
//! is behind this trait so implementations can be swapped and mocked.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("calendar days are not strictly increasing at {date}")]
    OutOfOrder { date: NaiveDate },

    #[error("no trading days between {start} and {end}")]
    EmptyRange { start: NaiveDate, end: NaiveDate },
}

/// Source of valid trading days for a date range.
pub trait TradingCalendar: Send + Sync {
    /// Human-readable name of this calendar.
    fn name(&self) -> &str;

    /// Ordered trading days within `[start, end]`, inclusive.
    fn trading_days(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<NaiveDate>, CalendarError>;
}

/// Calendar backed by an explicit, pre-fetched day list.
#[derive(Debug, Clone)]
pub struct StaticCalendar {
    days: Vec<NaiveDate>,
}

impl StaticCalendar {
    /// Build from an ordered day list; rejects out-of-order or duplicate days.
    pub fn new(days: Vec<NaiveDate>) -> Result<Self, CalendarError> {
        for pair in days.windows(2) {
            if pair[1] <= pair[0] {
                return Err(CalendarError::OutOfOrder { date: pair[1] });
            }
        }
        Ok(Self { days })
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl TradingCalendar for StaticCalendar {
    fn name(&self) -> &str {
        "static"
    }

    fn trading_days(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<NaiveDate>, CalendarError> {
        let days: Vec<NaiveDate> = self
            .days
            .iter()
            .copied()
            .filter(|day| *day >= start && *day <= end)
            .collect();
        if days.is_empty() {
            return Err(CalendarError::EmptyRange { start, end });
        }
        Ok(days)
    }
}
