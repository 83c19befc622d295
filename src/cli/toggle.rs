use anyhow::Result;
use pathscope_session::SnapshotSource;
use serde_json::json;
use tracing::info;

use crate::cli::context::CliContext;
use crate::render::OutputFormat;

pub async fn cmd_toggle(ctx: &CliContext) -> Result<()> {
    let source = ctx.source()?;
    let response = source.toggle().await?;
    info!(status = response.status.as_str(), "backend answered toggle");

    match ctx.output() {
        OutputFormat::Json => println!(
            "{}",
            json!({
                "status": response.status.as_str(),
                "session_id": response.session_id,
            })
        ),
        OutputFormat::Human => match &response.session_id {
            Some(id) => println!("Transmission {} (session {})", response.status.as_str(), id),
            None => println!("Transmission {}", response.status.as_str()),
        },
    }
    Ok(())
}
