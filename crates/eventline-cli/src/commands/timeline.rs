//! Timeline rendering and window navigation.

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use eventline_core::timeline::scroll_offset;
use eventline_core::{CanvasWidth, CategoryFilter, Config, Frame, GameEvent, ViewState};

use super::load_schedule;

/// Canvas pixels per terminal column.
const PX_PER_COLUMN: u32 = 20;
const LABEL_COLUMNS: usize = 6;

#[derive(Subcommand)]
pub enum TimelineAction {
    /// Draw the four-month timeline
    Show {
        /// Output the render frame as JSON
        #[arg(long)]
        json: bool,
        /// Reference year (defaults to view.year)
        #[arg(long)]
        year: Option<i32>,
        /// Month offset from January of the reference year
        #[arg(long, allow_hyphen_values = true)]
        offset: Option<i32>,
        /// Category filter: all, main, story, event, high_difficulty, gacha, campaign
        #[arg(long)]
        filter: Option<CategoryFilter>,
        /// Canvas width in pixels (800-5000)
        #[arg(long)]
        width: Option<u32>,
    },
    /// Move the saved window
    Nav {
        #[command(subcommand)]
        step: NavStep,
    },
}

#[derive(Subcommand)]
pub enum NavStep {
    /// One month back
    Prev,
    /// One month forward
    Next,
    /// Bring today into view
    Today {
        /// Viewport width used to compute the scroll position
        #[arg(long, default_value_t = 1280)]
        viewport: u32,
    },
    /// Jump to an explicit window
    Set {
        year: i32,
        #[arg(allow_hyphen_values = true)]
        offset: i32,
    },
}

pub fn run(action: TimelineAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimelineAction::Show {
            json,
            year,
            offset,
            filter,
            width,
        } => {
            let config = Config::load()?;
            let canvas_width = match width {
                Some(px) => CanvasWidth::new(px)?,
                None => config.view.canvas_width,
            };
            let (_, snapshot) = load_schedule(&config)?;
            let state = ViewState::new(
                snapshot.events,
                year.unwrap_or(config.view.year),
                offset.unwrap_or(config.view.month_offset),
            )
            .with_filter(filter.unwrap_or(config.view.filter))
            .with_canvas_width(canvas_width);

            let frame = state.frame(today())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&frame)?);
            } else {
                print!("{}", render(&frame, state.events(), canvas_width.px()));
                if let Some(updated_at) = snapshot.updated_at {
                    println!("Last updated: {}", updated_at.to_rfc3339());
                }
            }
        }
        TimelineAction::Nav { step } => {
            let mut config = Config::load()?;
            let mut state = ViewState::new(Vec::new(), config.view.year, config.view.month_offset);
            match step {
                NavStep::Prev => state.prev_month(),
                NavStep::Next => state.next_month(),
                NavStep::Today { viewport } => {
                    if let Some(pct) = state.jump_to_today(today())? {
                        let scroll = scroll_offset(config.view.canvas_width.px(), pct, viewport);
                        println!("Today at {pct:.2}% (scroll to {:.0}px)", scroll.max(0.0));
                    }
                }
                NavStep::Set { year, offset } => state.set_window(year, offset),
            }
            let period = state.period()?;
            config.view.year = state.year();
            config.view.month_offset = state.month_offset();
            config.save()?;
            println!("{}", period.label());
        }
    }
    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Plain-text rendering: week header, then one row per bar.
fn render(frame: &Frame, events: &[GameEvent], canvas_width: u32) -> String {
    let columns = (canvas_width / PX_PER_COLUMN) as usize;
    let to_column = |pct: f64| (pct / 100.0 * columns as f64).floor() as i64;
    let today_column = frame.today.map(to_column);

    let mut out = format!("{}\n", frame.period.label());

    let mut header = vec![' '; columns + LABEL_COLUMNS];
    for marker in &frame.weeks {
        let col = to_column(marker.percent).clamp(0, columns as i64 - 1) as usize;
        for (i, ch) in marker.label.chars().enumerate() {
            if let Some(slot) = header.get_mut(col + i) {
                *slot = ch;
            }
        }
    }
    out.push_str(header.iter().collect::<String>().trim_end());
    out.push('\n');

    for bar in &frame.bars {
        let title = events
            .iter()
            .find(|e| e.id == bar.event_id)
            .map_or(bar.event_id.as_str(), |e| e.title.as_str());

        let mut row = vec![' '; columns];
        if let Some(col) = today_column {
            if let Some(slot) = row.get_mut(col as usize) {
                *slot = '|';
            }
        }

        let start = to_column(bar.left_percent);
        let end = to_column(bar.right_percent()).max(start + 1);
        for col in start.max(0)..end.min(columns as i64) {
            row[col as usize] = '=';
        }
        if start < 0 {
            row[0] = '<';
        }
        if end > columns as i64 {
            row[columns - 1] = '>';
        }

        let pixels_per_percent = f64::from(canvas_width) / 100.0;
        let label_pct = bar.left_percent + bar.clipping_padding_pixels / pixels_per_percent;
        let label_col = to_column(label_pct).max(0) as usize + 1;
        let label_end = end.clamp(0, columns as i64) as usize;
        for (i, ch) in title.chars().enumerate() {
            let col = label_col + i;
            if col >= label_end {
                break;
            }
            row[col] = ch;
        }

        out.push_str(row.iter().collect::<String>().trim_end());
        out.push('\n');
    }

    if frame.bars.is_empty() {
        out.push_str("(no events in this window)\n");
    }
    out
}
