//! Event management commands for CLI.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use eventline_core::view::filter_events;
use eventline_core::{
    banner_data_url, Category, CategoryFilter, Config, EventDraft, GameEvent, ViewState,
};

use super::{load_schedule, save_schedule};

#[derive(Args)]
#[group(multiple = false)]
pub struct BannerArgs {
    /// Banner image URL
    #[arg(long)]
    banner: Option<String>,
    /// Local image to embed as a data URL (png, jpg, gif, webp)
    #[arg(long)]
    banner_file: Option<PathBuf>,
}

impl BannerArgs {
    fn resolve(self) -> Result<Option<String>, Box<dyn std::error::Error>> {
        match (self.banner, self.banner_file) {
            (Some(url), _) => Ok(Some(url)),
            (None, Some(path)) => Ok(Some(banner_data_url(&path)?)),
            (None, None) => Ok(None),
        }
    }
}

#[derive(Subcommand)]
pub enum EventAction {
    /// List events in manual order
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Category filter (defaults to view.filter)
        #[arg(long)]
        filter: Option<CategoryFilter>,
    },
    /// Show one event with its calendar link
    Show {
        /// Event ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new event
    Add {
        /// Event title
        title: String,
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,
        /// Last day, inclusive (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,
        /// Category
        #[arg(long = "type")]
        category: Category,
        #[command(flatten)]
        banner: BannerArgs,
        #[arg(long)]
        description: Option<String>,
    },
    /// Edit an existing event
    Edit {
        /// Event ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(long = "type")]
        category: Option<Category>,
        #[command(flatten)]
        banner: BannerArgs,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete an event
    Delete {
        /// Event ID
        id: String,
    },
    /// Move an event within the manual order (filter must be "all")
    Move {
        /// Current position (0-based)
        from: usize,
        /// New position (0-based)
        to: usize,
    },
}

pub fn run(action: EventAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let (store, snapshot) = load_schedule(&config)?;
    let revision = snapshot.revision;
    let mut state = ViewState::new(
        snapshot.events,
        config.view.year,
        config.view.month_offset,
    )
    .with_filter(config.view.filter);

    let message = match action {
        EventAction::List { json, filter } => {
            let filter = filter.unwrap_or(state.filter);
            if json {
                let visible: Vec<_> = filter_events(state.events(), filter).collect();
                println!("{}", serde_json::to_string_pretty(&visible)?);
            } else {
                for (index, event) in state.events().iter().enumerate() {
                    if !filter.matches(event.category) {
                        continue;
                    }
                    println!(
                        "{index:>3}  {:<8}  {} .. {}  {}  ({})",
                        event.category.short_label(),
                        event.start_date,
                        event.end_date,
                        event.title,
                        event.id
                    );
                }
            }
            return Ok(());
        }
        EventAction::Show { id, json } => {
            let event = state
                .find_event(&id)
                .ok_or_else(|| format!("event not found: {id}"))?;
            if json {
                let mut value = serde_json::to_value(event)?;
                value["calendarUrl"] = event.calendar_url().into();
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print!("{}", describe(event));
            }
            return Ok(());
        }
        EventAction::Add {
            title,
            start,
            end,
            category,
            banner,
            description,
        } => {
            let mut draft = EventDraft::new(title, start, end, category);
            draft.banner_image = banner.resolve()?;
            draft.description = description;
            let event = draft.create()?;
            let message = format!("Event created: {}", event.id);
            state.add_event(event);
            message
        }
        EventAction::Edit {
            id,
            title,
            start,
            end,
            category,
            banner,
            description,
        } => {
            let existing = state
                .find_event(&id)
                .ok_or_else(|| format!("event not found: {id}"))?;
            let mut draft = EventDraft::from_event(existing);
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(start) = start {
                draft.start_date = start;
            }
            if let Some(end) = end {
                draft.end_date = end;
            }
            if let Some(category) = category {
                draft.category = category;
            }
            if let Some(banner) = banner.resolve()? {
                draft.banner_image = Some(banner);
            }
            if let Some(description) = description {
                draft.description = Some(description);
            }
            state.replace_event(draft.into_event(id.as_str())?)?;
            format!("Event updated: {id}")
        }
        EventAction::Delete { id } => {
            let removed = state.remove_event(&id)?;
            format!("Event deleted: {} ({})", removed.id, removed.title)
        }
        EventAction::Move { from, to } => {
            state.move_event(from, to)?;
            format!("Event moved: {from} -> {to}")
        }
    };

    save_schedule(&config, &*store, state.events(), Some(revision))?;
    println!("{message}");
    Ok(())
}

/// Detail card: title, range, category, description, banner, calendar link.
fn describe(event: &GameEvent) -> String {
    let mut out = format!(
        "{}\n{}  [{}]\n",
        event.title,
        event.date_range_label(),
        event.category.as_str().to_uppercase()
    );
    if let Some(description) = &event.description {
        out.push_str(&format!("\n{description}\n\n"));
    }
    match &event.banner_image {
        Some(banner) if banner.starts_with("data:") => out.push_str("Banner: (embedded image)\n"),
        Some(banner) => out.push_str(&format!("Banner: {banner}\n")),
        None => {}
    }
    out.push_str(&format!("Add to Google Calendar: {}\n", event.calendar_url()));
    out
}
