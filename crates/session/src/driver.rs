use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, OptionFuture};
use pathscope_core_types::{SnapshotModel, TransmissionStatus};
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::context::SessionContext;
use crate::error::{SessionResult, SourceError};
use crate::metrics;
use crate::model::{PollConfig, SessionCommand, ToggleReply};
use crate::ports::SnapshotSource;
use crate::render::{RenderOp, RenderSink};

type PendingFetch = BoxFuture<'static, (u64, Result<SnapshotModel, SourceError>)>;

/// Cooperative polling loop. Commands, the in-flight fetch and the poll
/// deadline are serialised through one `select!`, so at most one fetch is
/// outstanding and the next is scheduled only after the previous result has
/// been applied.
pub struct SessionDriver {
    source: Arc<dyn SnapshotSource>,
    sink: Box<dyn RenderSink>,
    ctx: SessionContext,
    config: PollConfig,
    commands: mpsc::Receiver<SessionCommand>,
    cancel: CancellationToken,
    in_flight: Option<PendingFetch>,
    next_poll: Option<Instant>,
}

impl SessionDriver {
    pub fn new(
        source: Arc<dyn SnapshotSource>,
        sink: Box<dyn RenderSink>,
        ctx: SessionContext,
        config: PollConfig,
        commands: mpsc::Receiver<SessionCommand>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            source,
            sink,
            ctx,
            config,
            commands,
            cancel,
            in_flight: None,
            next_poll: None,
        }
    }

    /// Runs until shutdown or cancellation and hands back the final context.
    pub async fn run(mut self) -> SessionContext {
        if self.config.fetch_on_start {
            self.issue_fetch();
        }

        loop {
            let poll_due = self.ctx.is_polling() && self.in_flight.is_none();
            let deadline = self.next_poll.unwrap_or_else(Instant::now);

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    debug!("session driver cancelled");
                    break;
                }
                command = self.commands.recv() => match command {
                    None | Some(SessionCommand::Shutdown) => break,
                    Some(SessionCommand::Toggle { reply }) => self.toggle(reply).await,
                    Some(SessionCommand::Refresh) => {
                        if self.in_flight.is_none() {
                            self.issue_fetch();
                        }
                    }
                    Some(SessionCommand::Reset) => {
                        let ops = self.ctx.reset();
                        self.emit(&ops);
                    }
                },
                Some((epoch, result)) = OptionFuture::from(self.in_flight.as_mut()) => {
                    self.in_flight = None;
                    self.complete_fetch(epoch, result);
                }
                _ = sleep_until(deadline), if poll_due && self.next_poll.is_some() => {
                    self.issue_fetch();
                }
            }
        }

        self.ctx
    }

    fn issue_fetch(&mut self) {
        let source = Arc::clone(&self.source);
        let epoch = self.ctx.epoch();
        self.next_poll = None;
        metrics::record_poll_issued();
        self.in_flight = Some(
            async move {
                let result = source.fetch_snapshot().await;
                (epoch, result)
            }
            .boxed(),
        );
    }

    fn complete_fetch(&mut self, epoch: u64, result: Result<SnapshotModel, SourceError>) {
        if epoch != self.ctx.epoch() {
            metrics::record_poll_discarded();
            debug!(epoch, current = self.ctx.epoch(), "discarding stale snapshot");
            // A restart may have been waiting on this fetch; poll right away.
            self.next_poll = self.ctx.is_polling().then(Instant::now);
            return;
        }

        match result {
            Ok(snapshot) => {
                let was_polling = self.ctx.is_polling();
                let ops = self.ctx.apply_snapshot(&snapshot);
                metrics::record_poll_applied();
                self.emit(&ops);
                if was_polling && !self.ctx.is_polling() {
                    self.ctx.advance_epoch();
                    info!(state = %self.ctx.state(), "polling stopped");
                }
            }
            Err(err) => {
                metrics::record_transport_error();
                warn!(%err, "snapshot fetch failed");
            }
        }
        self.schedule_next();
    }

    fn schedule_next(&mut self) {
        self.next_poll = if self.ctx.is_polling() && self.in_flight.is_none() {
            Some(Instant::now() + self.config.interval)
        } else {
            None
        };
    }

    async fn toggle(&mut self, reply: Option<ToggleReply>) {
        let outcome = self.confirm_toggle().await;
        if let Err(err) = &outcome {
            warn!(%err, "toggle request failed; session state unchanged");
        }
        if let Some(reply) = reply {
            let _ = reply.send(outcome);
        }
    }

    async fn confirm_toggle(&mut self) -> SessionResult<TransmissionStatus> {
        let response = self.source.toggle().await?;
        let was_polling = self.ctx.is_polling();
        let (ops, transition) = self.ctx.apply_toggle(&response);
        self.emit(&ops);

        if was_polling != self.ctx.is_polling() {
            self.ctx.advance_epoch();
        }
        if self.ctx.is_polling() && !was_polling {
            info!(to = %transition.to, "backend confirmed start; polling");
            self.next_poll = Some(Instant::now());
        } else if !self.ctx.is_polling() {
            self.next_poll = None;
        }
        Ok(response.status)
    }

    fn emit(&mut self, ops: &[RenderOp]) {
        if ops.is_empty() {
            return;
        }
        if let Err(err) = self.sink.apply(ops) {
            warn!(%err, count = ops.len(), "render sink rejected operations");
        }
    }
}
