pub mod console;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub use console::ConsoleSink;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lane view and readouts for a terminal
    #[default]
    Human,
    /// One render operation per line
    Json,
}
