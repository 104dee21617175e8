use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::entries::EntryLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Status { id, status } = cmd {
        let mut pool = DbPool::new(&cfg.database)?;
        let entry = EntryLogic::patch_status(&mut pool, *id, status)?;
        success(format!("Entry #{} is now {}.", entry.id, entry.status));
    }
    Ok(())
}
