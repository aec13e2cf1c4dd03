//! Admin login state.
//!
//! The password is only checked by the store on the next save.

use clap::Subcommand;
use eventline_core::{open_vault, AdminSession, Config};

use super::load_schedule;

#[derive(Subcommand)]
pub enum AdminAction {
    /// Log in as admin
    Login {
        /// Admin password
        password: String,
    },
    /// Log out
    Logout,
    /// Show login state and last update time
    Status,
}

pub fn run(action: AdminAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let vault = open_vault(&config.session)?;
    match action {
        AdminAction::Login { password } => {
            let mut session = AdminSession::anonymous();
            session.login(password)?;
            session.persist(&*vault)?;
            println!("logged in");
        }
        AdminAction::Logout => {
            let mut session = AdminSession::restore(&*vault)?;
            session.logout();
            session.persist(&*vault)?;
            println!("logged out");
        }
        AdminAction::Status => {
            let session = AdminSession::restore(&*vault)?;
            println!("{}", if session.is_admin() { "admin" } else { "anonymous" });

            let (_, snapshot) = load_schedule(&config)?;
            match snapshot.updated_at {
                Some(updated_at) => println!(
                    "Last updated: {} (revision {})",
                    updated_at.to_rfc3339(),
                    snapshot.revision
                ),
                None => println!("Last updated: never"),
            }
        }
    }
    Ok(())
}
