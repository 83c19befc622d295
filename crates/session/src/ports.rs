use async_trait::async_trait;
use pathscope_core_types::{HistoryEntry, SnapshotModel, ToggleResponse};
use std::sync::Arc;

use crate::error::SourceError;

/// Backend collaborator the session polls. The session never talks to the
/// network itself.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch_snapshot(&self) -> Result<SnapshotModel, SourceError>;
    async fn toggle(&self) -> Result<ToggleResponse, SourceError>;
    async fn history(&self) -> Result<Vec<HistoryEntry>, SourceError>;
    async fn clear_history(&self) -> Result<(), SourceError>;
}

#[async_trait]
impl<S> SnapshotSource for Arc<S>
where
    S: SnapshotSource + ?Sized,
{
    async fn fetch_snapshot(&self) -> Result<SnapshotModel, SourceError> {
        (**self).fetch_snapshot().await
    }

    async fn toggle(&self) -> Result<ToggleResponse, SourceError> {
        (**self).toggle().await
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>, SourceError> {
        (**self).history().await
    }

    async fn clear_history(&self) -> Result<(), SourceError> {
        (**self).clear_history().await
    }
}
