//! Word Ledger CLI - count previously unseen words in uploaded jsonl files
//!
//! This is the command-line interface for Word Ledger. It wires the manual
//! and event-driven entry points to the core updater.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod logging;
mod output;

use clap::Parser;
use wordledger_core::LedgerError;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::constants::exit_codes;

fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.quiet, cli.verbose);

    if let Err(err) = run(&cli) {
        eprintln!("Error: {}", err);
        std::process::exit(exit_code(&err));
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Count(args) => {
            let ctx = AppContext::load(cli)?;
            commands::handle_count(&ctx, args)
        }
        Commands::HandleEvent(args) => {
            let ctx = AppContext::load(cli)?;
            commands::handle_event(&ctx, args)
        }
        Commands::Completions(args) => commands::handle_completions(args),
    }
}

fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<LedgerError>() {
        Some(LedgerError::NotFound(_)) => exit_codes::NOT_FOUND,
        Some(LedgerError::Configuration(_)) => exit_codes::INVALID_INPUT,
        Some(LedgerError::MalformedRecord { .. }) => exit_codes::MALFORMED_RECORD,
        _ => 1,
    }
}
