use anyhow::{Context, Result};
use clap::Args;
use pathscope_chart::tooltip_for;
use pathscope_core_types::IdentityKey;
use pathscope_session::{RenderSink, SnapshotSource};

use super::watch::session_context;
use crate::cli::context::CliContext;
use crate::render::{ConsoleSink, OutputFormat};

#[derive(Args, Clone, Debug)]
pub struct SnapshotArgs {
    /// Describe one packet by identity key, e.g. `A-1712000000123`
    #[arg(long, value_name = "KEY")]
    pub key: Option<String>,
}

pub async fn cmd_snapshot(args: SnapshotArgs, ctx: &CliContext) -> Result<()> {
    let key = args
        .key
        .as_deref()
        .map(str::parse::<IdentityKey>)
        .transpose()?;

    let source = ctx.source()?;
    let snapshot = source.fetch_snapshot().await?;

    if let Some(key) = key {
        let tooltip = tooltip_for(&snapshot, &key);
        match ctx.output() {
            OutputFormat::Json => println!("{}", serde_json::to_string(&tooltip)?),
            OutputFormat::Human => {
                println!("{}", tooltip.title);
                for line in &tooltip.lines {
                    println!("  {line}");
                }
            }
        }
        return Ok(());
    }

    let mut session = session_context(ctx.config())?;
    let ops = session.apply_snapshot(&snapshot);
    ConsoleSink::stdout(ctx.output())
        .apply(&ops)
        .context("writing snapshot")?;
    Ok(())
}
