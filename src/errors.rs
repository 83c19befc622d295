//! Error types surfaced by the command line front end.

use pathscope_session::{SessionError, SourceError};
use pathscope_timeline::TlError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid backend url {url}: {source}")]
    BackendUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build http client: {0}")]
    HttpClient(String),

    #[error(transparent)]
    Layout(#[from] TlError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("metrics encoding failed: {0}")]
    Metrics(String),
}

pub type CliResult<T> = Result<T, CliError>;
