use crate::cli::commands::show::print_entry;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::entries::EntryLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::EntryInput;
use crate::ui::messages::success;

/// Record a new overtime entry.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Add {
        person,
        start,
        finish,
        description,
        status,
    } = cmd
    {
        let input = EntryInput {
            person: person.clone(),
            start_time: start.clone(),
            finish_time: finish.clone(),
            description: description.clone(),
            status: status.clone(),
        };

        let mut pool = DbPool::new(&cfg.database)?;
        let entry = EntryLogic::create(&mut pool, &input)?;

        success(format!("Entry #{} recorded ({}).", entry.id, entry.duration_label()));
        print_entry(&entry);
    }

    Ok(())
}
