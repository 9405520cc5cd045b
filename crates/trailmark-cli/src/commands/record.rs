//! Append one history row
//!
//! Usage: trailmark record --db <PATH> --subject-type <T> --subject-id <ID>
//!        --event <create|update|destroy> --attributes <JSON> [--changes <JSON>] [--actor <A>]

use clap::Args;
use serde_json::json;
use std::path::PathBuf;
use trailmark_core::model::attributes::changeset_from_attributes;
use trailmark_core::{AttributeMap, Event, Subject};

use super::{print_json, CliResult, Context};

#[derive(Debug, Args)]
pub struct RecordArgs {
    #[arg(long)]
    pub db: PathBuf,

    #[arg(long)]
    pub subject_type: String,

    #[arg(long)]
    pub subject_id: String,

    #[arg(long)]
    pub event: Event,

    /// Initial attributes for a create, current attributes otherwise (JSON object)
    #[arg(long, default_value = "{}")]
    pub attributes: String,

    /// Changes of an update as a JSON object of `[old, new]` pairs
    #[arg(long)]
    pub changes: Option<String>,

    #[arg(long)]
    pub actor: Option<String>,
}

pub fn execute(ctx: &Context, args: RecordArgs) -> CliResult {
    let attributes: AttributeMap = serde_json::from_str(&args.attributes)
        .map_err(|e| format!("--attributes must be a JSON object: {}", e))?;
    let changes = args
        .changes
        .as_deref()
        .map(|raw| -> CliResult<_> {
            let map: AttributeMap = serde_json::from_str(raw)
                .map_err(|e| format!("--changes must be a JSON object: {}", e))?;
            Ok(changeset_from_attributes(map).map_err(|e| format!("--changes: {}", e))?)
        })
        .transpose()?;

    let conn = ctx.open(&args.db)?;
    let id = ctx.trail.record(
        &conn,
        &ctx.table,
        args.event,
        &Subject::new(args.subject_type, args.subject_id),
        &attributes,
        changes.as_ref(),
        args.actor.as_deref(),
    )?;

    print_json(&json!({ "id": id }))
}
