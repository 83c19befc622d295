use std::sync::Arc;

use pathscope_core_types::TransmissionStatus;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::context::SessionContext;
use crate::driver::SessionDriver;
use crate::error::{SessionError, SessionResult};
use crate::model::{PollConfig, SessionCommand};
use crate::ports::SnapshotSource;
use crate::render::RenderSink;

/// Owner-side handle of a spawned [`SessionDriver`].
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    cancel: CancellationToken,
    worker: JoinHandle<SessionContext>,
}

impl SessionHandle {
    pub fn spawn(
        source: Arc<dyn SnapshotSource>,
        sink: Box<dyn RenderSink>,
        ctx: SessionContext,
        config: PollConfig,
    ) -> SessionResult<Self> {
        config.validate()?;
        let (tx, rx) = mpsc::channel(config.command_buffer);
        let cancel = CancellationToken::new();
        let driver = SessionDriver::new(source, sink, ctx, config, rx, cancel.clone());
        let worker = tokio::spawn(driver.run());
        Ok(Self {
            commands: tx,
            cancel,
            worker,
        })
    }

    /// Resolves once the backend has answered and the session has reacted.
    pub async fn toggle(&self) -> SessionResult<TransmissionStatus> {
        let (tx, rx) = oneshot::channel();
        self.send(SessionCommand::Toggle { reply: Some(tx) }).await?;
        rx.await.map_err(|_| SessionError::Closed)?
    }

    /// Fetches now unless a fetch is already in flight.
    pub async fn refresh(&self) -> SessionResult<()> {
        self.send(SessionCommand::Refresh).await
    }

    pub async fn reset(&self) -> SessionResult<()> {
        self.send(SessionCommand::Reset).await
    }

    /// Stops the driver and returns its final context.
    pub async fn shutdown(self) -> SessionResult<SessionContext> {
        if self.commands.send(SessionCommand::Shutdown).await.is_err() {
            self.cancel.cancel();
        }
        self.join().await
    }

    async fn join(self) -> SessionResult<SessionContext> {
        self.worker
            .await
            .map_err(|err| SessionError::Join(err.to_string()))
    }

    async fn send(&self, command: SessionCommand) -> SessionResult<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SessionError::Closed)
    }
}
