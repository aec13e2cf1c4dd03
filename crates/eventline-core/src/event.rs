//! Schedule event types.
//!
//! The wire shape of [`GameEvent`] matches the portable schedule document
//! (`startDate`, `endDate`, `type`, ...), so documents exported by older
//! dashboards import unchanged.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;
use uuid::Uuid;

use crate::error::ValidationError;

/// Fixed set of event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Main,
    Story,
    Event,
    HighDifficulty,
    Gacha,
    Campaign,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Self::Main,
        Self::Story,
        Self::Event,
        Self::HighDifficulty,
        Self::Gacha,
        Self::Campaign,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Story => "story",
            Self::Event => "event",
            Self::HighDifficulty => "high_difficulty",
            Self::Gacha => "gacha",
            Self::Campaign => "campaign",
        }
    }

    /// Short upper-case label used in the filter bar.
    pub fn short_label(&self) -> &'static str {
        match self {
            Self::Main => "MAIN",
            Self::Story => "STORY",
            Self::Event => "EVENT",
            Self::HighDifficulty => "HIGH",
            Self::Gacha => "GACHA",
            Self::Campaign => "CAMPAIGN",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "main" => Ok(Self::Main),
            "story" => Ok(Self::Story),
            "event" => Ok(Self::Event),
            "high_difficulty" | "high" => Ok(Self::HighDifficulty),
            "gacha" => Ok(Self::Gacha),
            "campaign" => Ok(Self::Campaign),
            _ => Err(ValidationError::UnknownCategory(s.to_string())),
        }
    }
}

/// Which categories are currently rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => *only == category,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(category) => category.fmt(f),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        filter.to_string()
    }
}

impl TryFrom<String> for CategoryFilter {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Google Calendar "add event" template endpoint.
pub const CALENDAR_TEMPLATE_URL: &str = "https://www.google.com/calendar/render";

/// A single scheduled event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEvent {
    pub id: String,
    pub title: String,
    /// First day, inclusive.
    pub start_date: NaiveDate,
    /// Last day, inclusive.
    pub end_date: NaiveDate,
    #[serde(rename = "type")]
    pub category: Category,
    /// Image URL or `data:` URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl GameEvent {
    /// Inclusive number of days covered. Non-positive for a reversed range.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    pub fn has_valid_range(&self) -> bool {
        self.end_date >= self.start_date
    }

    /// Check the invariants enforced at data entry.
    ///
    /// # Errors
    /// Returns an error if the title is blank or `end_date < start_date`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if !self.has_valid_range() {
            return Err(ValidationError::InvalidDateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }

    /// `yyyy/MM/dd - yyyy/MM/dd`, both ends inclusive.
    pub fn date_range_label(&self) -> String {
        format!(
            "{} - {}",
            self.start_date.format("%Y/%m/%d"),
            self.end_date.format("%Y/%m/%d")
        )
    }

    /// Link that pre-fills an all-day Google Calendar entry for this event.
    ///
    /// Calendar all-day ranges are end-exclusive, so the end is pushed one
    /// day past `end_date`.
    pub fn calendar_url(&self) -> String {
        let end = self
            .end_date
            .checked_add_days(Days::new(1))
            .unwrap_or(self.end_date);
        let dates = format!(
            "{}/{}",
            self.start_date.format("%Y%m%d"),
            end.format("%Y%m%d")
        );
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("action", "TEMPLATE")
            .append_pair("text", &self.title)
            .append_pair("dates", &dates)
            .append_pair("details", self.description.as_deref().unwrap_or_default())
            .finish();
        format!("{CALENDAR_TEMPLATE_URL}?{query}")
    }

    /// Placeholder shown when the shared schedule has never been written.
    pub fn welcome() -> Self {
        Self {
            id: "1".to_string(),
            title: "Welcome to Endfield Schedule".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 1, 22).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap_or_default(),
            category: Category::Main,
            banner_image: None,
            description: None,
        }
    }
}

/// Form input for creating or editing an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub category: Category,
    pub banner_image: Option<String>,
    pub description: Option<String>,
}

impl EventDraft {
    pub fn new(
        title: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        category: Category,
    ) -> Self {
        Self {
            title: title.into(),
            start_date,
            end_date,
            category,
            banner_image: None,
            description: None,
        }
    }

    /// Pre-fill a draft from an existing event (edit form).
    pub fn from_event(event: &GameEvent) -> Self {
        Self {
            title: event.title.clone(),
            start_date: event.start_date,
            end_date: event.end_date,
            category: event.category,
            banner_image: event.banner_image.clone(),
            description: event.description.clone(),
        }
    }

    pub fn with_banner(mut self, banner: impl Into<String>) -> Self {
        self.banner_image = Some(banner.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validate and build an event with a freshly generated id.
    ///
    /// # Errors
    /// See [`GameEvent::validate`].
    pub fn create(self) -> Result<GameEvent, ValidationError> {
        self.into_event(Uuid::new_v4().to_string())
    }

    /// Validate and build an event with the given id (edits keep their id).
    ///
    /// # Errors
    /// See [`GameEvent::validate`].
    pub fn into_event(self, id: impl Into<String>) -> Result<GameEvent, ValidationError> {
        let event = GameEvent {
            id: id.into(),
            title: self.title.trim().to_string(),
            start_date: self.start_date,
            end_date: self.end_date,
            category: self.category,
            banner_image: self.banner_image.filter(|b| !b.is_empty()),
            description: self.description.filter(|d| !d.trim().is_empty()),
        };
        event.validate()?;
        Ok(event)
    }
}
