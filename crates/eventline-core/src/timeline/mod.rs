//! Timeline layout and date-window computation.
//!
//! This module provides:
//! - The rolling four-month view window ([`ViewPeriod`])
//! - Monday gridlines ([`week_markers`])
//! - The optional "today" gridline ([`today_percent`])
//! - Event bar geometry with off-screen label padding ([`layout_event`])
//! - Frame assembly combining all of the above ([`Frame`])
//!
//! Everything here is pure: no I/O, no shared state.

mod frame;
mod grid;
mod layout;
mod period;
mod today;

pub use frame::Frame;
pub use grid::{week_markers, WeekMarker, WeekMarkers};
pub use layout::{
    layout_event, layout_events, BarGeometry, CanvasWidth, LayoutRecord, LABEL_RESERVE_PX,
};
pub use period::{ViewPeriod, MONTHS_IN_VIEW};
pub use today::{jump_to_today, scroll_offset, today_percent};
