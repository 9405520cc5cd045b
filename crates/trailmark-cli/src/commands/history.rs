//! List the history of one subject, oldest first

use clap::Args;
use std::path::PathBuf;
use trailmark_core::Subject;

use super::{print_json, CliResult, Context};

#[derive(Debug, Args)]
pub struct HistoryArgs {
    #[arg(long)]
    pub db: PathBuf,

    #[arg(long)]
    pub subject_type: String,

    #[arg(long)]
    pub subject_id: String,
}

pub fn execute(ctx: &Context, args: HistoryArgs) -> CliResult {
    let conn = ctx.open(&args.db)?;
    let records = ctx.trail.versions_for(
        &conn,
        &ctx.table,
        &Subject::new(args.subject_type, args.subject_id),
    )?;
    print_json(&ctx.render_all(&conn, &records)?)
}
