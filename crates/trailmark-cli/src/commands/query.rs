//! Run one query shape
//!
//! Usage: trailmark query --db <PATH> <SHAPE> <ARG>
//!
//! `ARG` is JSON. Anything that does not parse as JSON is taken as a plain
//! string, so `where-attribute-changes name` works without quoting.

use clap::Args;
use serde_json::Value;
use std::path::PathBuf;
use trailmark_engine::QueryShape;

use super::{print_json, CliResult, Context};

#[derive(Debug, Args)]
pub struct QueryArgs {
    #[arg(long)]
    pub db: PathBuf,

    /// where-object, where-object-changes, where-object-changes-from,
    /// where-object-changes-to or where-attribute-changes
    pub shape: QueryShape,

    pub argument: String,
}

pub fn execute(ctx: &Context, args: QueryArgs) -> CliResult {
    let argument = serde_json::from_str(&args.argument)
        .unwrap_or_else(|_| Value::String(args.argument.clone()));

    let conn = ctx.open(&args.db)?;
    let records = ctx.trail.find(&conn, &ctx.table, args.shape, &argument)?;
    print_json(&ctx.render_all(&conn, &records)?)
}
