//! One render pass worth of derived geometry.

use chrono::NaiveDate;
use serde::Serialize;

use super::grid::{week_markers, WeekMarker};
use super::layout::{layout_events, LayoutRecord};
use super::period::ViewPeriod;
use super::today::today_percent;
use crate::event::GameEvent;

/// Everything presentation needs to draw the timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub period: ViewPeriod,
    pub weeks: Vec<WeekMarker>,
    /// Absent when today is outside the period.
    pub today: Option<f64>,
    pub bars: Vec<LayoutRecord>,
}

impl Frame {
    /// Build a frame from an already-filtered event sequence.
    pub fn build<'a, I>(events: I, period: ViewPeriod, canvas_width: u32, today: NaiveDate) -> Self
    where
        I: IntoIterator<Item = &'a GameEvent>,
    {
        Self {
            weeks: week_markers(&period).collect(),
            today: today_percent(&period, today),
            bars: layout_events(events, &period, canvas_width),
            period,
        }
    }
}
