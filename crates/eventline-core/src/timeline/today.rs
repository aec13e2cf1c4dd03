//! The "today" gridline.

use chrono::{Datelike, NaiveDate};

use super::period::ViewPeriod;

/// Position of `today` within `period`, or `None` when it lies outside.
///
/// An absent marker is a distinct state: callers omit the gridline instead of
/// drawing it at an edge.
pub fn today_percent(period: &ViewPeriod, today: NaiveDate) -> Option<f64> {
    period
        .contains(today)
        .then(|| period.percent_of(today))
}

/// Month offset after pressing "jump to today".
///
/// When today is already visible the offset is kept (the caller scrolls to
/// the marker instead). Otherwise, if today falls in the reference year, the
/// window moves to start at today's month.
pub fn jump_to_today(year: i32, month_offset: i32, period: &ViewPeriod, today: NaiveDate) -> i32 {
    if today_percent(period, today).is_none() && today.year() == year {
        today.month0() as i32
    } else {
        month_offset
    }
}

/// Horizontal scroll position that centres the marker in a viewport.
///
/// May be negative; scroll containers clamp it themselves.
pub fn scroll_offset(canvas_width: u32, today_percent: f64, viewport_width: u32) -> f64 {
    f64::from(canvas_width) * today_percent / 100.0 - f64::from(viewport_width) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn present_inside_period() {
        let period = ViewPeriod::new(2026, 0).unwrap();
        assert_eq!(today_percent(&period, date(2026, 1, 1)), Some(0.0));
        let last = today_percent(&period, date(2026, 4, 30)).unwrap();
        assert!((last - 100.0 * 119.0 / 120.0).abs() < 1e-9);
    }

    #[test]
    fn absent_outside_period() {
        let period = ViewPeriod::new(2026, 0).unwrap();
        assert_eq!(today_percent(&period, date(2025, 12, 31)), None);
        assert_eq!(today_percent(&period, date(2026, 5, 1)), None);
    }

    #[test]
    fn jump_moves_window_within_reference_year() {
        let period = ViewPeriod::new(2026, 0).unwrap();
        assert_eq!(jump_to_today(2026, 0, &period, date(2026, 10, 19)), 9);
        // Visible already: keep offset.
        assert_eq!(jump_to_today(2026, 0, &period, date(2026, 2, 1)), 0);
        // Different year: nothing to do.
        assert_eq!(jump_to_today(2026, 0, &period, date(2027, 10, 19)), 0);
    }

    #[test]
    fn scroll_centres_marker() {
        assert_eq!(scroll_offset(1600, 50.0, 1000), 300.0);
        assert_eq!(scroll_offset(1600, 0.0, 1000), -500.0);
    }
}
