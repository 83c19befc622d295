//! Shared primitives for the pathscope telemetry front end.
//!
//! A [`SnapshotModel`] is decoded whole on every poll; nothing here keeps
//! state between polls. Merging across polls happens in the render layer
//! through [`IdentityKey`]s.

pub mod error;
pub mod history;
pub mod packet;
pub mod snapshot;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use error::{MalformedRecord, ModelError, SkipReason};
pub use history::{HistoryEntry, ToggleResponse};
pub use packet::{identity_key, IdentityKey, Lane, PacketKind, PacketRecord, PacketStatus, PathId};
pub use snapshot::{
    CompressionStats, PathCounters, PathStats, PerformanceStats, SnapshotModel,
    TransmissionState, TransmissionStatus,
};

/// Backend-assigned identifier of one transmission session.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
