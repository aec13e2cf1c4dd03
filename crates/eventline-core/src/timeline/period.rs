//! Rolling four-month view window.

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

use crate::error::ValidationError;

/// Number of calendar months covered by a view.
pub const MONTHS_IN_VIEW: u32 = 4;

/// The visible period `[start, end]`, both inclusive.
///
/// `start` is the first day of a month and `end` is the last day of the
/// third month after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewPeriod {
    start: NaiveDate,
    end: NaiveDate,
    total_days: i64,
}

impl ViewPeriod {
    /// Compute the window starting at month `month_offset` (zero-based,
    /// signed, unbounded) of `year`.
    ///
    /// Offsets outside `0..12` roll over into neighbouring years, so
    /// `(2026, 12)` starts in January 2027 and `(2026, -1)` in December 2025.
    ///
    /// # Errors
    /// Returns an error if the resulting dates fall outside chrono's range.
    pub fn new(year: i32, month_offset: i32) -> Result<Self, ValidationError> {
        let out_of_range = || ValidationError::PeriodOutOfRange { year, month_offset };

        let absolute = i64::from(year) * 12 + i64::from(month_offset);
        let start_year = i32::try_from(absolute.div_euclid(12)).map_err(|_| out_of_range())?;
        let start_month = absolute.rem_euclid(12) as u32 + 1;

        let start = NaiveDate::from_ymd_opt(start_year, start_month, 1).ok_or_else(out_of_range)?;
        let end = start
            .checked_add_months(Months::new(MONTHS_IN_VIEW))
            .and_then(|next| next.pred_opt())
            .ok_or_else(out_of_range)?;

        Ok(Self::from_bounds(start, end))
    }

    fn from_bounds(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            total_days: (end - start).num_days() + 1,
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Inclusive day count; always at least 120.
    pub fn total_days(&self) -> i64 {
        self.total_days
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Signed whole days from `start` to `date`.
    pub fn days_from_start(&self, date: NaiveDate) -> i64 {
        (date - self.start).num_days()
    }

    /// Position of `date` as a percentage of the period. Negative before
    /// `start`, above 100 after `end`.
    pub fn percent_of(&self, date: NaiveDate) -> f64 {
        self.days_to_percent(self.days_from_start(date))
    }

    /// Convert a day count into a percentage of the period.
    pub fn days_to_percent(&self, days: i64) -> f64 {
        100.0 * days as f64 / self.total_days as f64
    }

    /// Range label such as `2026/01 - 2026/04`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.start.format("%Y/%m"), self.end.format("%Y/%m"))
    }

    pub fn start_year(&self) -> i32 {
        self.start.year()
    }
}
