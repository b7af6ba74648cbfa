//! few CLI
//!
//! Declares packages ("words") for a project and materializes them under
//! `.few/words`.

mod cli;
mod commands;
mod context;
mod error;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use context::Context;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let Some(command) = cli.command else {
        // No command: usage only, no preflight
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let cwd = std::env::current_dir()?;
    let ctx = Context::prepare(&cli.global, &cwd)?;
    execute_command(&ctx, command)
}

/// Logs go to stderr; `RUST_LOG` overrides the level picked by `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init();
    tracing::debug!("Verbose mode enabled");
}

fn execute_command(ctx: &Context, command: Commands) -> Result<()> {
    match command {
        Commands::Listen {
            package: None,
            json,
        } => commands::run_listen_init(&ctx.engine, &ctx.root, json),
        Commands::Listen {
            package: Some(token),
            json,
        } => commands::run_listen_package(&ctx.engine, &ctx.root, &token, json),
        Commands::Litany { json } => commands::run_litany(&ctx.engine, &ctx.root, json),
    }
}
