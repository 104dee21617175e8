use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::entries::EntryLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::Entry;
use crate::utils::time::format_display;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Show { id } = cmd {
        let pool = DbPool::new(&cfg.database)?;
        let entry = EntryLogic::show(&pool, *id)?;
        print_entry(&entry);
    }
    Ok(())
}

/// Detail view used by every command that returns a single entry.
pub fn print_entry(entry: &Entry) {
    println!("🧾 Entry #{}", entry.id);
    println!("   Person      : {}", entry.person);
    println!("   Start       : {}", format_display(entry.start_time));
    println!("   Finish      : {}", format_display(entry.finish_time));
    println!("   Duration    : {}", entry.duration_label());
    println!("   Status      : {}", entry.status);
    println!("   Description : {}", entry.description);
    println!("   Created     : {}", format_display(entry.created_at));
    println!("   Updated     : {}", format_display(entry.updated_at));
}
