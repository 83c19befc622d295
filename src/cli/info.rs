use anyhow::Result;
use pathscope_session::metrics as session_metrics;

use crate::cli::context::CliContext;
use crate::render::OutputFormat;

pub async fn cmd_info(ctx: &CliContext) -> Result<()> {
    let config = ctx.config();
    let counters = session_metrics::snapshot();

    if ctx.output() == OutputFormat::Json {
        let doc = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "build_date": env!("BUILD_DATE"),
            "git_hash": env!("GIT_HASH"),
            "config_path": ctx.config_path(),
            "config": config,
            "session": counters,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!("pathscope System Information");
    println!("============================");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!("Build Date: {}", env!("BUILD_DATE"));
    println!("Git Commit: {} ({})", env!("GIT_HASH"), env!("GIT_BRANCH"));
    println!();

    println!("Configuration ({}):", ctx.config_path().display());
    println!("- Backend: {}", config.backend_url);
    println!(
        "- Poll Interval: {}",
        humantime::format_duration(config.poll_interval())
    );
    println!(
        "- Request Timeout: {}",
        humantime::format_duration(config.request_timeout())
    );
    println!("- Fetch On Start: {}", config.fetch_on_start);
    println!(
        "- Timeline: {} px/s, lane offsets A={} B={} ack={}",
        config.timeline.px_per_second,
        config.timeline.lane_offsets.path_a,
        config.timeline.lane_offsets.path_b,
        config.timeline.lane_offsets.ack
    );
    println!(
        "- Chart Rows: A={} B={} ack={}",
        config.chart.path_a, config.chart.path_b, config.chart.ack
    );
    match ctx.metrics_port() {
        0 => println!("- Metrics: disabled"),
        port => println!("- Metrics: http://0.0.0.0:{port}/metrics"),
    }
    println!();

    println!("Session counters (this process):");
    println!(
        "- Polls issued/applied/discarded: {}/{}/{}",
        counters.polls_issued, counters.polls_applied, counters.polls_discarded
    );
    println!("- Transport errors: {}", counters.transport_errors);
    println!("- Records skipped: {}", counters.records_skipped);
    println!("- Unknown statuses: {}", counters.unknown_statuses);
    println!(
        "- Charts constructed/destroyed: {}/{}",
        counters.chart_constructs, counters.chart_destroys
    );
    Ok(())
}
