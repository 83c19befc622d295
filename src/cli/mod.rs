pub mod app;
pub mod commands;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod env;
pub mod history;
pub mod info;
pub mod runtime;
pub mod snapshot;
pub mod toggle;
pub mod watch;

pub use app::run;
pub use config::{cmd_config, ConfigArgs};
pub use history::{cmd_history, HistoryArgs};
pub use snapshot::{cmd_snapshot, SnapshotArgs};
pub use toggle::cmd_toggle;
pub use watch::{cmd_watch, WatchArgs};
