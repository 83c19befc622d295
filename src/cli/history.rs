use anyhow::Result;
use clap::Args;
use pathscope_session::SnapshotSource;

use crate::cli::context::CliContext;
use crate::render::OutputFormat;

#[derive(Args, Clone, Debug)]
pub struct HistoryArgs {
    /// Delete all stored runs instead of listing them
    #[arg(long)]
    pub clear: bool,
}

pub async fn cmd_history(args: HistoryArgs, ctx: &CliContext) -> Result<()> {
    let source = ctx.source()?;
    if args.clear {
        source.clear_history().await?;
        println!("History cleared");
        return Ok(());
    }

    let entries = source.history().await?;
    match ctx.output() {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Human if entries.is_empty() => println!("No finished runs"),
        OutputFormat::Human => {
            println!(
                "{:<20} {:>12} {:>8} {:>8}",
                "date", "total rtt", "packets", "loss"
            );
            for entry in &entries {
                println!(
                    "{:<20} {:>9.2} ms {:>8} {:>7.1}%",
                    entry.date, entry.total_rtt, entry.total_packets, entry.packet_loss_rate
                );
            }
        }
    }
    Ok(())
}
