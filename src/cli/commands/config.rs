use crate::cli::parser::Commands;
use crate::config::{Config, missing_fields};
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use std::fs;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
    } = cmd
    {
        let path = Config::config_file();

        if *print_config {
            println!("📄 Current configuration:\n");
            println!("{}", cfg.to_yaml()?);
        }

        if *check {
            if !path.exists() {
                warning(format!(
                    "No configuration file at {}; defaults are in use. Run `rovertime init`.",
                    path.display()
                ));
                return Ok(());
            }

            let content = fs::read_to_string(&path)?;
            let missing = missing_fields(&content)?;
            if missing.is_empty() {
                success(format!("{} is complete.", path.display()));
            } else {
                warning(format!("{} is missing fields:", path.display()));
                for key in missing {
                    println!("   - {key}");
                }
                info("Missing fields use their default values.");
            }
        }
    }

    Ok(())
}
