use anyhow::Result;
use clap::Parser;

use netusage::cli::{commands, Cli, Commands};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Usage {
            window,
            interface,
            weighted,
            json,
        } => {
            commands::run_usage(&cli.store, window, interface.as_deref(), weighted, json)?;
        }
        Commands::Clear => {
            commands::run_clear(&cli.store)?;
        }
    }

    Ok(())
}
