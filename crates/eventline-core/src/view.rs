//! Application view state: the authoritative event order, the category
//! filter and the current window.
//!
//! Edits mutate the in-memory sequence only; callers persist the result
//! through an [`AdminSession`](crate::session::AdminSession).

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{ReorderError, ValidationError};
use crate::event::{CategoryFilter, GameEvent};
use crate::timeline::{self, CanvasWidth, Frame, ViewPeriod};

/// Events matching `filter`, in their original relative order.
pub fn filter_events<'a>(
    events: &'a [GameEvent],
    filter: CategoryFilter,
) -> impl Iterator<Item = &'a GameEvent> + 'a {
    events.iter().filter(move |event| filter.matches(event.category))
}

/// Move the event at `from` to `to` within the full sequence.
///
/// Only allowed while `filter` is [`CategoryFilter::All`]: indexes of a
/// filtered subset do not map onto the full list.
///
/// # Errors
/// Returns an error if a filter is active or either index is out of bounds.
pub fn move_event(
    events: &mut Vec<GameEvent>,
    filter: CategoryFilter,
    from: usize,
    to: usize,
) -> Result<(), ReorderError> {
    if !filter.is_all() {
        return Err(ReorderError::Filtered {
            filter: filter.to_string(),
        });
    }
    let len = events.len();
    for index in [from, to] {
        if index >= len {
            return Err(ReorderError::OutOfBounds { index, len });
        }
    }

    let moved = events.remove(from);
    events.insert(to, moved);
    Ok(())
}

/// Explicit application state passed into the pure timeline functions.
#[derive(Debug, Clone)]
pub struct ViewState {
    events: Vec<GameEvent>,
    pub filter: CategoryFilter,
    year: i32,
    month_offset: i32,
    pub canvas_width: CanvasWidth,
}

impl ViewState {
    pub fn new(events: Vec<GameEvent>, year: i32, month_offset: i32) -> Self {
        Self {
            events,
            filter: CategoryFilter::All,
            year,
            month_offset,
            canvas_width: CanvasWidth::default(),
        }
    }

    pub fn with_filter(mut self, filter: CategoryFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_canvas_width(mut self, canvas_width: CanvasWidth) -> Self {
        self.canvas_width = canvas_width;
        self
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<GameEvent> {
        self.events
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month_offset(&self) -> i32 {
        self.month_offset
    }

    /// Events currently rendered under the active filter.
    pub fn visible_events(&self) -> impl Iterator<Item = &GameEvent> {
        filter_events(&self.events, self.filter)
    }

    pub fn find_event(&self, id: &str) -> Option<&GameEvent> {
        self.events.iter().find(|event| event.id == id)
    }

    /// Append a new event at the end of the manual order.
    pub fn add_event(&mut self, event: GameEvent) {
        debug!(event_id = %event.id, "adding event");
        self.events.push(event);
    }

    /// Replace the event with the same id, keeping its position.
    ///
    /// # Errors
    /// Returns an error if no event has that id.
    pub fn replace_event(&mut self, event: GameEvent) -> Result<(), ValidationError> {
        let slot = self
            .events
            .iter_mut()
            .find(|existing| existing.id == event.id)
            .ok_or_else(|| ValidationError::UnknownEvent(event.id.clone()))?;
        debug!(event_id = %event.id, "replacing event");
        *slot = event;
        Ok(())
    }

    /// Remove an event by id.
    ///
    /// # Errors
    /// Returns an error if no event has that id.
    pub fn remove_event(&mut self, id: &str) -> Result<GameEvent, ValidationError> {
        let index = self
            .events
            .iter()
            .position(|event| event.id == id)
            .ok_or_else(|| ValidationError::UnknownEvent(id.to_string()))?;
        debug!(event_id = %id, "removing event");
        Ok(self.events.remove(index))
    }

    /// Manual reorder; see [`move_event`].
    ///
    /// # Errors
    /// Returns an error if a filter is active or an index is out of bounds.
    pub fn move_event(&mut self, from: usize, to: usize) -> Result<(), ReorderError> {
        move_event(&mut self.events, self.filter, from, to)
    }

    /// Current view period.
    ///
    /// # Errors
    /// Returns an error if the window is outside the supported calendar.
    pub fn period(&self) -> Result<ViewPeriod, ValidationError> {
        ViewPeriod::new(self.year, self.month_offset)
    }

    pub fn prev_month(&mut self) {
        self.month_offset = self.month_offset.saturating_sub(1);
    }

    pub fn next_month(&mut self) {
        self.month_offset = self.month_offset.saturating_add(1);
    }

    pub fn set_window(&mut self, year: i32, month_offset: i32) {
        self.year = year;
        self.month_offset = month_offset;
    }

    /// Apply the "jump to today" control.
    ///
    /// Returns the marker position when today is already visible, so the
    /// caller can scroll to it.
    ///
    /// # Errors
    /// Returns an error if the window is outside the supported calendar.
    pub fn jump_to_today(&mut self, today: NaiveDate) -> Result<Option<f64>, ValidationError> {
        let period = self.period()?;
        self.month_offset = timeline::jump_to_today(self.year, self.month_offset, &period, today);
        Ok(timeline::today_percent(&self.period()?, today))
    }

    /// Render-ready frame for the current state.
    ///
    /// # Errors
    /// Returns an error if the window is outside the supported calendar.
    pub fn frame(&self, today: NaiveDate) -> Result<Frame, ValidationError> {
        Ok(Frame::build(
            self.visible_events(),
            self.period()?,
            self.canvas_width.px(),
            today,
        ))
    }
}
