use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use wordledger_core::VERSION;

/// Word Ledger - count how many previously unseen words each uploaded file introduces
#[derive(Parser)]
#[command(name = "wordledger")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file
    #[arg(long, global = true, env = "WORDLEDGER_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Use a local directory as blob storage (one subdirectory per bucket)
    #[arg(long, global = true, env = "WORDLEDGER_LOCAL_ROOT", value_name = "DIR")]
    pub local_root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Arguments for the `count` command
#[derive(Args)]
pub struct CountArgs {
    /// jsonl file to count
    #[arg(long, alias = "jsonl_file", value_name = "NAME")]
    pub jsonl_file: Option<String>,

    /// Unique words file in the output bucket
    #[arg(long, alias = "unique_words", value_name = "NAME")]
    pub unique_words: Option<String>,

    /// Bucket holding the jsonl file
    #[arg(long, value_name = "BUCKET")]
    pub bucket: Option<String>,

    /// Bucket holding the unique words file
    #[arg(long, alias = "output_bucket", value_name = "BUCKET")]
    pub output_bucket: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `handle-event` command
#[derive(Args)]
pub struct HandleEventArgs {
    /// Storage event document (reads stdin when omitted or `-`)
    #[arg(long, value_name = "PATH")]
    pub event: Option<PathBuf>,

    /// Bucket holding the unique words file
    #[arg(long, env = "OUTPUT_BUCKET", value_name = "BUCKET")]
    pub output_bucket: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge one jsonl file into the unique words ledger
    Count(CountArgs),

    /// Handle a storage upload event (CloudEvent JSON)
    HandleEvent(HandleEventArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}
