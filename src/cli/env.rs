use clap::Parser;
use std::path::PathBuf;

use super::commands::Commands;
use crate::render::OutputFormat;

/// Live view of a multipath transmission monitor.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    /// YAML config file (default: ./config/pathscope.yaml, then the user config dir)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Default tracing filter when RUST_LOG is unset
    #[arg(short, long, default_value = "info", value_name = "LEVEL")]
    pub log_level: String,

    /// Shorthand for `--log-level debug`
    #[arg(short, long)]
    pub debug: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    pub log_json: bool,

    /// Render format; overrides `output` from the config file
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Port for the Prometheus `/metrics` endpoint, 0 to disable
    #[arg(long, default_value_t = 9090, value_name = "PORT")]
    pub metrics_port: u16,

    #[command(subcommand)]
    pub command: Commands,
}
