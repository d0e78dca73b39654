//! hostproc CLI library: argument parsing and command dispatch.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

/// Run the CLI: parse args, init tracing, dispatch.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    hostproc_core::observability::init_tracing();
    tracing::debug!(command = ?cli.command, "dispatching");

    match cli.command {
        Commands::Inspect {
            json,
            exec_path,
            args,
        } => {
            commands::inspect::cmd_inspect(args, exec_path.as_deref(), json)?;
        }
        Commands::Env { json } => {
            commands::env::cmd_env(json)?;
        }
        Commands::Slots => {
            commands::slots::cmd_slots()?;
        }
    }

    Ok(())
}
