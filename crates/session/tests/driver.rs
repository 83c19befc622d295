use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use pathscope_chart::ChartOp;
use pathscope_core_types::{
    HistoryEntry, PacketRecord, PathId, SessionId, SnapshotModel, ToggleResponse,
    TransmissionStatus,
};
use pathscope_session::{
    metrics, LifecycleState, PollConfig, RecordingSink, RenderOp, SessionContext, SessionError,
    SessionHandle, SnapshotSource, SourceError,
};
use pathscope_timeline::TimelineOp;

/// Replays scripted responses; the last snapshot repeats once the script runs out.
#[derive(Default)]
struct ScriptedSource {
    snapshots: Mutex<VecDeque<Result<SnapshotModel, SourceError>>>,
    last: Mutex<Option<SnapshotModel>>,
    toggles: Mutex<VecDeque<Result<ToggleResponse, SourceError>>>,
    fetch_delay: Option<Duration>,
    fetches: AtomicUsize,
}

impl ScriptedSource {
    fn new(
        snapshots: Vec<Result<SnapshotModel, SourceError>>,
        toggles: Vec<Result<ToggleResponse, SourceError>>,
    ) -> Self {
        Self {
            snapshots: Mutex::new(snapshots.into()),
            toggles: Mutex::new(toggles.into()),
            ..Self::default()
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = Some(delay);
        self
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotSource for ScriptedSource {
    async fn fetch_snapshot(&self) -> Result<SnapshotModel, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.fetch_delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.snapshots.lock().pop_front();
        match next {
            Some(Ok(snapshot)) => {
                *self.last.lock() = Some(snapshot.clone());
                Ok(snapshot)
            }
            Some(Err(err)) => Err(err),
            None => self
                .last
                .lock()
                .clone()
                .ok_or_else(|| SourceError::Transport("script exhausted".into())),
        }
    }

    async fn toggle(&self) -> Result<ToggleResponse, SourceError> {
        self.toggles
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(SourceError::Transport("no toggle scripted".into())))
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>, SourceError> {
        Ok(Vec::new())
    }

    async fn clear_history(&self) -> Result<(), SourceError> {
        Ok(())
    }
}

fn running(packets: Vec<PacketRecord>) -> SnapshotModel {
    SnapshotModel::with_packets(packets).with_status(TransmissionStatus::Running)
}

fn toggled(status: TransmissionStatus) -> ToggleResponse {
    ToggleResponse {
        status,
        session_id: Some(SessionId::new("session-1")),
    }
}

fn config() -> PollConfig {
    PollConfig {
        fetch_on_start: false,
        ..PollConfig::default().with_interval(Duration::from_millis(100))
    }
}

fn spawn(source: Arc<ScriptedSource>, sink: &RecordingSink) -> SessionHandle {
    SessionHandle::spawn(
        source,
        Box::new(sink.clone()),
        SessionContext::default(),
        config(),
    )
    .unwrap()
}

fn chart_ops(ops: &[RenderOp]) -> Vec<ChartOp> {
    ops.iter()
        .filter_map(|op| match op {
            RenderOp::Chart(chart) => Some(chart.clone()),
            _ => None,
        })
        .collect()
}

fn appends(ops: &[RenderOp]) -> usize {
    ops.iter()
        .filter(|op| matches!(op, RenderOp::Timeline(TimelineOp::Append { .. })))
        .count()
}

#[tokio::test(start_paused = true)]
async fn session_runs_to_completion_and_destroys_chart_once() {
    let p1 = PacketRecord::data(1, 1_000, PathId::PathA);
    let p2 = PacketRecord::ack(1, 1_040);
    let source = Arc::new(ScriptedSource::new(
        vec![
            Ok(running(vec![p1.clone()])),
            Ok(running(vec![p1.clone(), p2.clone()])),
            Ok(SnapshotModel::with_packets(vec![p1, p2]).with_status(TransmissionStatus::Completed)),
        ],
        vec![Ok(toggled(TransmissionStatus::Running))],
    ));
    let sink = RecordingSink::new();
    let handle = spawn(source.clone(), &sink);

    assert_eq!(handle.toggle().await.unwrap(), TransmissionStatus::Running);
    tokio::time::sleep(Duration::from_secs(5)).await;

    let ctx = handle.shutdown().await.unwrap();
    assert_eq!(ctx.state(), LifecycleState::Completed);
    assert_eq!(source.fetches(), 3);
    assert_eq!(ctx.rendered().len(), 2);

    let ops = sink.ops();
    let chart = chart_ops(&ops);
    assert!(matches!(chart.first(), Some(ChartOp::Construct { .. })));
    let destroys = chart
        .iter()
        .filter(|op| matches!(op, ChartOp::Destroy { .. }))
        .count();
    assert_eq!(destroys, 1);
    assert!(matches!(chart.last(), Some(ChartOp::Destroy { .. })));
    assert_eq!(appends(&ops), 2);
}

#[tokio::test(start_paused = true)]
async fn failed_toggle_never_starts_polling() {
    let source = Arc::new(ScriptedSource::new(
        vec![Ok(running(vec![PacketRecord::ack(1, 10)]))],
        vec![Err(SourceError::Status {
            endpoint: "/api/transmission/toggle".into(),
            status: 500,
        })],
    ));
    let sink = RecordingSink::new();
    let handle = spawn(source.clone(), &sink);

    let err = handle.toggle().await.unwrap_err();
    assert!(matches!(err, SessionError::Source(SourceError::Status { status: 500, .. })));
    tokio::time::sleep(Duration::from_secs(3)).await;

    assert_eq!(source.fetches(), 0);
    let ctx = handle.shutdown().await.unwrap();
    assert_eq!(ctx.state(), LifecycleState::Idle);
    assert!(sink.is_empty());
}

#[tokio::test(start_paused = true)]
async fn stop_discards_in_flight_snapshot() {
    let source = Arc::new(
        ScriptedSource::new(
            vec![Ok(running(vec![PacketRecord::data(1, 10, PathId::PathB)]))],
            vec![
                Ok(toggled(TransmissionStatus::Running)),
                Ok(toggled(TransmissionStatus::parse("stopping"))),
            ],
        )
        .with_delay(Duration::from_millis(500)),
    );
    let discarded_before = metrics::snapshot().polls_discarded;
    let sink = RecordingSink::new();
    let handle = spawn(source.clone(), &sink);

    handle.toggle().await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(source.fetches(), 1);
    assert_eq!(handle.toggle().await.unwrap(), TransmissionStatus::Idle);
    tokio::time::sleep(Duration::from_secs(3)).await;

    let ctx = handle.shutdown().await.unwrap();
    assert_eq!(ctx.state(), LifecycleState::Idle);
    assert_eq!(source.fetches(), 1);
    assert_eq!(appends(&sink.ops()), 0);
    assert!(metrics::snapshot().polls_discarded > discarded_before);
}

#[tokio::test(start_paused = true)]
async fn transport_error_does_not_stop_polling() {
    let source = Arc::new(ScriptedSource::new(
        vec![
            Err(SourceError::Transport("connection refused".into())),
            Ok(running(vec![PacketRecord::data(3, 300, PathId::PathA)])),
        ],
        vec![Ok(toggled(TransmissionStatus::Running))],
    ));
    let sink = RecordingSink::new();
    let handle = spawn(source.clone(), &sink);

    handle.toggle().await.unwrap();
    tokio::time::sleep(Duration::from_millis(450)).await;

    assert!(source.fetches() >= 2);
    assert_eq!(appends(&sink.ops()), 1);
    let ctx = handle.shutdown().await.unwrap();
    assert!(ctx.is_polling());
}

#[tokio::test(start_paused = true)]
async fn unknown_status_keeps_polling() {
    let source = Arc::new(ScriptedSource::new(
        vec![
            Ok(running(Vec::new())),
            Ok(SnapshotModel::default().with_status(TransmissionStatus::parse("paused"))),
        ],
        vec![Ok(toggled(TransmissionStatus::Running))],
    ));
    let sink = RecordingSink::new();
    let handle = spawn(source.clone(), &sink);

    handle.toggle().await.unwrap();
    tokio::time::sleep(Duration::from_millis(1_050)).await;

    assert!(source.fetches() >= 5);
    let ctx = handle.shutdown().await.unwrap();
    assert_eq!(ctx.state(), LifecycleState::Running);
}

#[tokio::test(start_paused = true)]
async fn startup_fetch_discovers_running_session() {
    let source = Arc::new(ScriptedSource::new(
        vec![Ok(running(vec![PacketRecord::ack(2, 20)]))],
        Vec::new(),
    ));
    let sink = RecordingSink::new();
    let handle = SessionHandle::spawn(
        source.clone(),
        Box::new(sink.clone()),
        SessionContext::default(),
        PollConfig::default(),
    )
    .unwrap();

    tokio::time::sleep(Duration::from_millis(2_500)).await;
    assert!(source.fetches() >= 3);

    handle.reset().await.unwrap();
    let ctx = handle.shutdown().await.unwrap();
    assert!(ctx.rendered().is_empty());
    assert!(!ctx.chart().is_present());
}

#[tokio::test(start_paused = true)]
async fn refresh_fetches_once_while_idle() {
    let source = Arc::new(ScriptedSource::new(
        vec![Ok(SnapshotModel::with_packets(vec![PacketRecord::ack(1, 30)])
            .with_status(TransmissionStatus::Idle))],
        Vec::new(),
    ));
    let sink = RecordingSink::new();
    let handle = spawn(source.clone(), &sink);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(source.fetches(), 0);

    handle.refresh().await.unwrap();
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(source.fetches(), 1);

    let ctx = handle.shutdown().await.unwrap();
    assert_eq!(ctx.state(), LifecycleState::Idle);
    assert_eq!(ctx.rendered().len(), 1);
    let ops = sink.ops();
    assert_eq!(appends(&ops), 1);
    assert!(chart_ops(&ops).is_empty());
}
