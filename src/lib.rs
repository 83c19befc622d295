//! Terminal front end for the multipath transmission monitor.
//!
//! The reconciliation engine lives in the workspace crates; this crate wires
//! it to the backend's HTTP API, a console renderer and a metrics endpoint.

pub mod cli;
pub mod client;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod render;

pub use client::HttpSnapshotSource;
pub use config::Config;
pub use errors::{CliError, CliResult};
