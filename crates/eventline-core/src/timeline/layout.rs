//! Event bar geometry.
//!
//! Maps each event's inclusive date range onto the view period as a left
//! offset and a width, both in percent of the canvas. Bars that start before
//! the window keep a negative offset; their label is pushed right by a
//! clipping padding so it stays on screen.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::period::ViewPeriod;
use crate::error::ValidationError;
use crate::event::GameEvent;

/// Pixels of bar kept free for the label before padding is capped.
pub const LABEL_RESERVE_PX: f64 = 100.0;

/// Canvas width in pixels, validated against the zoom range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct CanvasWidth(u32);

impl CanvasWidth {
    pub const MIN: u32 = 800;
    pub const MAX: u32 = 5000;
    pub const DEFAULT: u32 = 1600;

    /// # Errors
    /// Returns an error if `px` is outside `MIN..=MAX`.
    pub fn new(px: u32) -> Result<Self, ValidationError> {
        if (Self::MIN..=Self::MAX).contains(&px) {
            Ok(Self(px))
        } else {
            Err(ValidationError::CanvasWidth {
                width: px,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    pub fn px(&self) -> u32 {
        self.0
    }
}

impl Default for CanvasWidth {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<u32> for CanvasWidth {
    type Error = ValidationError;

    fn try_from(px: u32) -> Result<Self, Self::Error> {
        Self::new(px)
    }
}

impl From<CanvasWidth> for u32 {
    fn from(width: CanvasWidth) -> Self {
        width.0
    }
}

/// Render-ready geometry of one event bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRecord {
    pub event_id: String,
    /// Offset of the bar start; negative when it starts before the window.
    pub left_percent: f64,
    /// Always positive.
    pub width_percent: f64,
    /// Label shift in pixels; zero unless the bar start is off-screen.
    pub clipping_padding_pixels: f64,
}

impl LayoutRecord {
    /// Right edge of the bar in percent.
    pub fn right_percent(&self) -> f64 {
        self.left_percent + self.width_percent
    }
}

/// Raw percentages for one event, before visibility filtering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    pub left_percent: f64,
    pub width_percent: f64,
}

impl BarGeometry {
    pub fn of(event: &GameEvent, period: &ViewPeriod) -> Self {
        Self {
            left_percent: period.percent_of(event.start_date),
            width_percent: period.days_to_percent(event.duration_days()),
        }
    }

    /// Non-positive width: the event's end precedes its start.
    pub fn is_degenerate(&self) -> bool {
        self.width_percent <= 0.0
    }

    /// Whether any part of the bar intersects the window.
    pub fn is_visible(&self) -> bool {
        self.left_percent + self.width_percent >= 0.0 && self.left_percent <= 100.0
    }

    /// Label padding for a bar whose start is scrolled off the left edge.
    ///
    /// Never exceeds the bar width minus [`LABEL_RESERVE_PX`], so the label
    /// cannot spill past the bar's right edge.
    pub fn clipping_padding(&self, canvas_width: u32) -> f64 {
        let pixels_per_percent = f64::from(canvas_width) / 100.0;
        let hidden_left = if self.left_percent < 0.0 {
            self.left_percent.abs() * pixels_per_percent
        } else {
            0.0
        };
        let bar_width = self.width_percent * pixels_per_percent;
        hidden_left.min((bar_width - LABEL_RESERVE_PX).max(0.0))
    }
}

/// Lay out one event, or `None` when it is degenerate or off-window.
pub fn layout_event(
    event: &GameEvent,
    period: &ViewPeriod,
    canvas_width: u32,
) -> Option<LayoutRecord> {
    let geometry = BarGeometry::of(event, period);

    if geometry.is_degenerate() {
        debug!(
            event_id = %event.id,
            start = %event.start_date,
            end = %event.end_date,
            "skipping event with reversed date range"
        );
        return None;
    }
    if !geometry.is_visible() {
        return None;
    }

    Some(LayoutRecord {
        event_id: event.id.clone(),
        left_percent: geometry.left_percent,
        width_percent: geometry.width_percent,
        clipping_padding_pixels: geometry.clipping_padding(canvas_width),
    })
}

/// Lay out every visible event, preserving input order.
pub fn layout_events<'a, I>(events: I, period: &ViewPeriod, canvas_width: u32) -> Vec<LayoutRecord>
where
    I: IntoIterator<Item = &'a GameEvent>,
{
    events
        .into_iter()
        .filter_map(|event| layout_event(event, period, canvas_width))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Category;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(id: &str, start: NaiveDate, end: NaiveDate) -> GameEvent {
        GameEvent {
            id: id.to_string(),
            title: id.to_string(),
            start_date: start,
            end_date: end,
            category: Category::Event,
            banner_image: None,
            description: None,
        }
    }

    fn january() -> ViewPeriod {
        ViewPeriod::new(2026, 0).unwrap()
    }

    /// Lay out a single event in the Jan-Apr 2026 window at 1600 px.
    fn lay(id: &str, start: NaiveDate, end: NaiveDate) -> Option<LayoutRecord> {
        layout_event(&event(id, start, end), &january(), 1600)
    }

    #[test]
    fn event_inside_window() {
        let record = lay("a", date(2026, 1, 22), date(2026, 2, 10)).unwrap();
        assert!((record.left_percent - 17.5).abs() < 1e-9);
        assert!((record.width_percent - 100.0 * 20.0 / 120.0).abs() < 1e-9);
        assert_eq!(record.clipping_padding_pixels, 0.0);
    }

    #[test]
    fn event_starting_before_window_is_padded() {
        let record = lay("b", date(2025, 12, 15), date(2026, 1, 5)).unwrap();
        assert!((record.left_percent - (-100.0 * 17.0 / 120.0)).abs() < 1e-9);
        assert!(record.right_percent() > 0.0);

        // 22 days at 16 px/% = 293.3 px bar; 226.7 px hidden; cap = 193.3 px.
        let bar_px = record.width_percent * 16.0;
        assert!((record.clipping_padding_pixels - (bar_px - LABEL_RESERVE_PX)).abs() < 1e-9);
    }

    #[test]
    fn padding_equals_hidden_part_for_long_bars() {
        let record = lay("c", date(2025, 12, 31), date(2026, 3, 31)).unwrap();
        let hidden = 100.0 / 120.0 * 16.0;
        assert!((record.clipping_padding_pixels - hidden).abs() < 1e-9);
    }

    #[test]
    fn short_offscreen_bar_gets_no_padding() {
        // 2 days = 26.7 px, below the label reserve.
        let record = lay("d", date(2025, 12, 31), date(2026, 1, 1)).unwrap();
        assert_eq!(record.clipping_padding_pixels, 0.0);
    }

    #[test]
    fn events_outside_window_are_dropped() {
        assert!(lay("before", date(2025, 11, 1), date(2025, 11, 30)).is_none());
        assert!(lay("after", date(2026, 5, 2), date(2026, 5, 3)).is_none());
    }

    #[test]
    fn event_ending_the_day_before_window_touches_left_edge() {
        // left + width == 0 exactly: still counted as intersecting.
        let record = lay("edge", date(2025, 12, 22), date(2025, 12, 31)).unwrap();
        assert!(record.right_percent().abs() < 1e-9);
    }

    #[test]
    fn event_starting_the_day_after_window_touches_right_edge() {
        // left == 100 exactly: still counted as intersecting.
        let record = lay("edge", date(2026, 5, 1), date(2026, 5, 3)).unwrap();
        assert_eq!(record.left_percent, 100.0);
        assert_eq!(record.clipping_padding_pixels, 0.0);
    }

    #[test]
    fn reversed_range_is_skipped() {
        assert!(lay("bad", date(2026, 2, 10), date(2026, 1, 22)).is_none());
        // Same-day reversal by one produces zero width.
        assert!(lay("zero", date(2026, 2, 10), date(2026, 2, 9)).is_none());
    }

    #[test]
    fn layout_preserves_order() {
        let events = vec![
            event("x", date(2026, 3, 1), date(2026, 3, 2)),
            event("gone", date(2027, 1, 1), date(2027, 1, 2)),
            event("y", date(2026, 1, 1), date(2026, 1, 2)),
        ];
        let ids: Vec<_> = layout_events(&events, &january(), 1600)
            .into_iter()
            .map(|r| r.event_id)
            .collect();
        assert_eq!(ids, ["x", "y"]);
    }

    #[test]
    fn canvas_width_bounds() {
        assert!(CanvasWidth::new(799).is_err());
        assert!(CanvasWidth::new(5001).is_err());
        assert_eq!(CanvasWidth::new(800).unwrap().px(), 800);
        assert_eq!(CanvasWidth::default().px(), 1600);
    }
}
