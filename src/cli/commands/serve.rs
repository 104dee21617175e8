use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::server;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Serve { addr } = cmd {
        let addr = addr.clone().unwrap_or_else(|| cfg.listen_addr.clone());
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(server::serve(cfg, &addr))?;
    }
    Ok(())
}
