//! Portable schedule document import/export.

use std::path::PathBuf;

use clap::Subcommand;
use eventline_core::{export_events, import_events, Config};

use super::{load_schedule, save_schedule};

#[derive(Subcommand)]
pub enum DataAction {
    /// Export the schedule as a JSON array
    Export {
        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Replace the schedule with a JSON document
    Import {
        /// Path to the document
        path: PathBuf,
        /// Overwrite even if someone saved since the last read
        #[arg(long)]
        force: bool,
    },
}

pub fn run(action: DataAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let (store, snapshot) = load_schedule(&config)?;

    match action {
        DataAction::Export { output } => {
            let document = export_events(&snapshot.events)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, document)?;
                    println!("Exported {} events to {}", snapshot.events.len(), path.display());
                }
                None => println!("{document}"),
            }
        }
        DataAction::Import { path, force } => {
            let text = std::fs::read_to_string(&path)?;
            let events = import_events(&text)?;
            let expected = (!force).then_some(snapshot.revision);
            save_schedule(&config, &*store, &events, expected)?;
            println!("Imported {} events", events.len());
        }
    }
    Ok(())
}
