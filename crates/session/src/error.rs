use thiserror::Error;

/// Failures reported by a [`crate::ports::SnapshotSource`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("{endpoint} answered with status {status}")]
    Status { endpoint: String, status: u16 },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("undecodable response: {0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("session driver is no longer running")]
    Closed,
    #[error("invalid session config: {0}")]
    InvalidConfig(String),
    #[error("session driver task failed: {0}")]
    Join(String),
}

#[derive(Debug, Error)]
#[error("render sink failed: {0}")]
pub struct SinkError(pub String);

pub type SessionResult<T> = Result<T, SessionError>;
