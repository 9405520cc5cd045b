//! Create the history table
//!
//! Usage: trailmark init --db <PATH> [--encoding text|json|jsonb]

use clap::{Args, ValueEnum};
use serde_json::json;
use std::path::PathBuf;
use trailmark_core::ColumnEncoding;
use trailmark_store::create_history_table;

use super::{print_json, CliResult, Context};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EncodingArg {
    Text,
    Json,
    Jsonb,
}

impl From<EncodingArg> for ColumnEncoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Text => ColumnEncoding::Text,
            EncodingArg::Json => ColumnEncoding::StructuredJson,
            EncodingArg::Jsonb => ColumnEncoding::StructuredBinaryJson,
        }
    }
}

#[derive(Debug, Args)]
pub struct InitArgs {
    #[arg(long)]
    pub db: PathBuf,

    /// Declared type of the snapshot and changes columns
    #[arg(long, value_enum, default_value = "text")]
    pub encoding: EncodingArg,
}

pub fn execute(ctx: &Context, args: InitArgs) -> CliResult {
    let conn = ctx.open(&args.db)?;
    let encoding = ColumnEncoding::from(args.encoding);

    // The migrations already created the default text table.
    let default_table = ctx.table.name == trailmark_core::HistoryTable::default().name;
    if default_table && encoding != ColumnEncoding::Text {
        return Err(format!(
            "table '{}' already exists with text columns; configure another table for {}",
            ctx.table.name, encoding
        )
        .into());
    }
    if !default_table {
        create_history_table(&conn, &ctx.table, encoding)?;
    }
    ctx.trail.reset_schema_cache();

    print_json(&json!({
        "table": ctx.table.name,
        "encoding": encoding.as_str(),
    }))
}
