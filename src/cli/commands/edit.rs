use crate::cli::commands::show::print_entry;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::entries::EntryLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::EntryInput;
use crate::ui::messages::success;

/// Full replace: every mutable field must be given again.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Edit {
        id,
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
            status: Some(status.clone()),
        };

        let mut pool = DbPool::new(&cfg.database)?;
        let entry = EntryLogic::replace(&mut pool, *id, &input)?;

        success(format!("Entry #{} updated.", entry.id));
        print_entry(&entry);
    }

    Ok(())
}
