//! Set the actor of a row written without one

use clap::Args;
use serde_json::json;
use std::path::PathBuf;

use super::{print_json, CliResult, Context};

#[derive(Debug, Args)]
pub struct BackfillArgs {
    #[arg(long)]
    pub db: PathBuf,

    #[arg(long)]
    pub id: i64,

    #[arg(long)]
    pub actor: String,
}

pub fn execute(ctx: &Context, args: BackfillArgs) -> CliResult {
    let conn = ctx.open(&args.db)?;
    let updated = ctx
        .trail
        .backfill_actor(&conn, &ctx.table, args.id, &args.actor)?;
    print_json(&json!({ "id": args.id, "updated": updated }))
}
