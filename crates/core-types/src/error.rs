use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("snapshot root must be a JSON object")]
    NotAnObject,
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("{0:?} is not an identity key; expected <A|B|ack>-<timestamp>")]
    InvalidKey(String),
}

/// Why a packet record was left out of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    #[error("record has no timestamp")]
    MissingTimestamp,
    #[error("record has no sequence number")]
    MissingSequence,
    #[error("data record has no path")]
    MissingPath,
    #[error("unrecognised path {0:?}")]
    UnknownPath(String),
    #[error("unrecognised packet type {0:?}")]
    UnknownKind(String),
    #[error("unrecognised packet status {0:?}")]
    UnknownStatus(String),
    #[error("record could not be decoded: {0}")]
    Undecodable(String),
}

/// A packet log entry that was skipped while decoding a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedRecord {
    /// Position of the record in the wire packet log.
    pub index: usize,
    pub reason: SkipReason,
}
