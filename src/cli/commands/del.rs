use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::entries::EntryLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

use std::io::{self, Write};

/// Ask a yes/no confirmation from the user
fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Del { id, yes } = cmd {
        let mut pool = DbPool::new(&cfg.database)?;

        // Fail on a missing id before asking anything.
        let entry = EntryLogic::show(&pool, *id)?;

        let prompt = format!(
            "Delete entry #{} ({}, {})? This action is irreversible.",
            entry.id,
            entry.person,
            entry.duration_label()
        );

        if !*yes && !ask_confirmation(&prompt) {
            info("Operation cancelled.");
            return Ok(());
        }

        EntryLogic::delete(&mut pool, *id)?;
        success(format!("Entry #{id} has been deleted."));
    }

    Ok(())
}
