//! Weekly gridlines.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::period::ViewPeriod;

/// A gridline placed at a Monday inside the view period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekMarker {
    pub percent: f64,
    /// Short `M/d` label, e.g. `1/5`.
    pub label: String,
}

/// Lazy iterator over the Mondays of a period.
///
/// Cloning restarts from the clone point; a fresh iterator is built from the
/// period whenever the window changes.
#[derive(Debug, Clone)]
pub struct WeekMarkers {
    period: ViewPeriod,
    cursor: Option<NaiveDate>,
}

impl WeekMarkers {
    pub fn new(period: &ViewPeriod) -> Self {
        Self {
            period: *period,
            cursor: first_monday_on_or_after(period.start()),
        }
    }
}

impl Iterator for WeekMarkers {
    type Item = WeekMarker;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let cursor = self.cursor?;
            if cursor > self.period.end() {
                self.cursor = None;
                return None;
            }
            self.cursor = cursor.checked_add_days(Days::new(7));

            let percent = self.period.percent_of(cursor);
            if (0.0..=100.0).contains(&percent) {
                return Some(WeekMarker {
                    percent,
                    label: cursor.format("%-m/%-d").to_string(),
                });
            }
        }
    }
}

/// Week markers for every Monday in `period`, ascending.
pub fn week_markers(period: &ViewPeriod) -> WeekMarkers {
    WeekMarkers::new(period)
}

fn first_monday_on_or_after(date: NaiveDate) -> Option<NaiveDate> {
    let ahead = (7 - date.weekday().num_days_from_monday()) % 7;
    date.checked_add_days(Days::new(u64::from(ahead)))
        .filter(|monday| monday.weekday() == Weekday::Mon)
}
