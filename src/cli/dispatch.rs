use super::config::cmd_config;
use super::env::CliArgs;
use super::history::cmd_history;
use super::info::cmd_info;
use super::snapshot::cmd_snapshot;
use super::toggle::cmd_toggle;
use super::watch::cmd_watch;
use crate::cli::commands::Commands;
use crate::cli::context::CliContext;
use anyhow::Result;

pub async fn dispatch(cli: &CliArgs, ctx: &CliContext) -> Result<()> {
    match cli.command.clone() {
        Commands::Watch(args) => cmd_watch(args, ctx).await,
        Commands::Snapshot(args) => cmd_snapshot(args, ctx).await,
        Commands::Toggle => cmd_toggle(ctx).await,
        Commands::History(args) => cmd_history(args, ctx).await,
        Commands::Config(args) => cmd_config(args, ctx).await,
        Commands::Info => cmd_info(ctx).await,
    }
}
