use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use pathscope_chart::LaneProjector;
use pathscope_session::{SessionContext, SessionHandle, SnapshotSource};
use pathscope_timeline::adapters::TracingEventsPort;
use pathscope_timeline::TimelineService;
use tracing::info;

use crate::cli::context::CliContext;
use crate::config::Config;
use crate::render::ConsoleSink;

#[derive(Args, Clone, Debug)]
pub struct WatchArgs {
    /// Ask the backend to start a transmission before watching
    #[arg(long)]
    pub start: bool,

    /// Fetch the current log once right away, even with `fetch_on_start` off
    #[arg(long)]
    pub refresh: bool,

    /// Poll interval override, e.g. `500ms` or `2s`
    #[arg(long, value_parser = humantime::parse_duration)]
    pub interval: Option<Duration>,

    /// Stop watching after this long instead of waiting for Ctrl-C
    #[arg(long, value_parser = humantime::parse_duration)]
    pub duration: Option<Duration>,
}

/// Session state wired to the configured layout and lane scale.
pub fn session_context(config: &Config) -> Result<SessionContext> {
    let timeline = TimelineService::with_layout(config.timeline.clone())?
        .with_events(Arc::new(TracingEventsPort));
    Ok(SessionContext::new(timeline, LaneProjector::new(config.chart)))
}

pub async fn cmd_watch(args: WatchArgs, ctx: &CliContext) -> Result<()> {
    let config = ctx.config();
    let mut poll = config.poll_config();
    if let Some(interval) = args.interval {
        poll = poll.with_interval(interval);
    }
    let source: Arc<dyn SnapshotSource> = Arc::new(ctx.source()?);
    let sink = Box::new(ConsoleSink::stdout(ctx.output()));

    info!(
        backend = %config.backend_url,
        interval = %humantime::format_duration(poll.interval),
        "watching transmission"
    );
    let fetch_on_start = poll.fetch_on_start;
    let handle = SessionHandle::spawn(source, sink, session_context(config)?, poll)?;

    if args.refresh && !fetch_on_start {
        handle.refresh().await?;
    }
    if args.start {
        let status = handle.toggle().await?;
        info!(status = status.as_str(), "toggle acknowledged");
    }

    let deadline = async {
        match args.duration {
            Some(duration) => tokio::time::sleep(duration).await,
            None => std::future::pending().await,
        }
    };
    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal.context("listening for Ctrl-C")?;
            info!("interrupted");
        }
        _ = deadline => info!("watch duration elapsed"),
    }

    let finished = handle.shutdown().await?;
    info!(
        state = ?finished.state(),
        rendered = finished.rendered().len(),
        "session closed"
    );
    Ok(())
}
