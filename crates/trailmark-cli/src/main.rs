//! Trailmark CLI
//!
//! Command-line interface for recording and querying history tables

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trailmark_core::logging_facility::{init, Profile};
use trailmark_core::StrategyKind;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "trailmark")]
#[command(about = "Trailmark - audit trail history tables", long_about = None)]
struct Cli {
    /// TOML settings file (table, columns, serializer, tracking options)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Serialization strategy for text columns; overrides the settings file
    #[arg(long, global = true)]
    serializer: Option<StrategyKind>,

    /// Logging profile (development, production, test)
    #[arg(long, global = true, default_value = "production")]
    log: Profile,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create the history table
    Init(commands::init::InitArgs),
    /// Append one history row
    Record(commands::record::RecordArgs),
    /// List the history of one subject
    History(commands::history::HistoryArgs),
    /// Run one of the five query shapes
    Query(commands::query::QueryArgs),
    /// Set the actor of a row written without one
    BackfillActor(commands::backfill::BackfillArgs),
}

fn main() {
    let cli = Cli::parse();
    init(cli.log);

    let result = commands::Context::load(cli.config.as_deref(), cli.serializer).and_then(|ctx| {
        match cli.command {
            Commands::Init(args) => commands::init::execute(&ctx, args),
            Commands::Record(args) => commands::record::execute(&ctx, args),
            Commands::History(args) => commands::history::execute(&ctx, args),
            Commands::Query(args) => commands::query::execute(&ctx, args),
            Commands::BackfillActor(args) => commands::backfill::execute(&ctx, args),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
