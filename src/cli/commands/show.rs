//! clinquery show - Show one record in full

use std::path::PathBuf;

use clap::Args;

use crate::app::AppContext;
use crate::cli::formatters::RecordCard;
use crate::cli::output::emit;
use crate::error::{CqError, Result};

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Record id
    pub id: String,

    /// Record file; defaults to [data] records_path or the built-in samples
    #[arg(long)]
    pub data: Option<PathBuf>,
}

pub fn run(ctx: &AppContext, args: &ShowArgs) -> Result<()> {
    let records = ctx.load_records(args.data.as_deref())?;
    let record = records
        .get(args.id.trim())
        .ok_or_else(|| CqError::RecordNotFound(args.id.clone()))?;

    let card = RecordCard::new(record).with_tiers(ctx.config.ranking.thresholds());
    emit(&card, ctx.output_format);
    Ok(())
}
