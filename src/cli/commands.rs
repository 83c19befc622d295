use clap::Subcommand;

use super::config::ConfigArgs;
use super::history::HistoryArgs;
use super::snapshot::SnapshotArgs;
use super::watch::WatchArgs;

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Follow a transmission session live
    Watch(WatchArgs),

    /// Fetch one snapshot and render it
    Snapshot(SnapshotArgs),

    /// Start or stop the transmission on the backend
    Toggle,

    /// List or clear finished runs
    History(HistoryArgs),

    /// Manage pathscope configuration
    Config(ConfigArgs),

    /// Show build, configuration and session counters
    Info,
}
