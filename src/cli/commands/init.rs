use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log::audit_quietly;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped with `--test`)
///  - the SQLite database, with every pending migration applied
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.as_deref(), cli.test)?;

    info("Initializing rOvertime…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database   : {}", &cfg.database);

    // Opening the pool creates the file and applies the schema.
    let pool = DbPool::new(&cfg.database)?;

    audit_quietly(
        &pool.conn,
        "init",
        "database",
        &format!("Database initialized at {}", &cfg.database),
    );

    success("rOvertime initialization completed!");
    Ok(())
}
