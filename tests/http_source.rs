mod support;

use std::time::Duration;

use pathscope_cli::HttpSnapshotSource;
use pathscope_core_types::{Lane, TransmissionStatus};
use pathscope_session::{SnapshotSource, SourceError};
use serde_json::json;
use support::Backend;
use url::Url;

fn source(base: Url) -> HttpSnapshotSource {
    HttpSnapshotSource::new(base, Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn toggle_then_stats_reports_running_session() {
    let (base, shared) = support::spawn(Backend::default()).await;
    let source = source(base);

    let idle = source.fetch_snapshot().await.unwrap();
    assert_eq!(idle.status(), &TransmissionStatus::Idle);
    assert!(idle.packets.is_empty());

    let response = source.toggle().await.unwrap();
    assert_eq!(response.status, TransmissionStatus::Running);
    assert_eq!(response.session_id.unwrap().to_string(), "1");

    let running = source.fetch_snapshot().await.unwrap();
    assert_eq!(running.status(), &TransmissionStatus::Running);
    assert_eq!(running.packets.len(), 3);
    let lanes: Vec<Lane> = running.packets.iter().map(|p| p.lane()).collect();
    assert_eq!(lanes, vec![Lane::PathA, Lane::PathB, Lane::Ack]);
    assert_eq!(running.compression.ratio_percent, 50.0);
    assert_eq!(running.paths.a.success_rate(), Some(100.0));
    assert_eq!(shared.lock().polls, 1);

    let stopped = source.toggle().await.unwrap();
    assert_eq!(stopped.status, TransmissionStatus::Idle);
    assert!(stopped.session_id.is_none());
}

#[tokio::test]
async fn history_lists_and_clears() {
    let backend = Backend {
        history: vec![json!({
            "date": "2026-10-01 12:00:00",
            "total_rtt": 41.5,
            "total_packets": 120,
            "packet_loss_rate": 2.5
        })],
        ..Backend::default()
    };
    let (base, shared) = support::spawn(backend).await;
    let source = source(base);

    let entries = source.history().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].total_packets, 120);
    assert_eq!(entries[0].packet_loss_rate, 2.5);

    source.clear_history().await.unwrap();
    assert!(shared.lock().history.is_empty());
    assert!(source.history().await.unwrap().is_empty());
}

#[tokio::test]
async fn server_errors_carry_the_endpoint() {
    let backend = Backend {
        fail_stats: true,
        ..Backend::default()
    };
    let (base, _shared) = support::spawn(backend).await;

    let err = source(base).fetch_snapshot().await.unwrap_err();
    assert_eq!(
        err,
        SourceError::Status {
            endpoint: "/api/stats".into(),
            status: 500,
        }
    );
}

#[tokio::test]
async fn closed_port_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base = Url::parse(&format!("http://{addr}")).unwrap();
    let err = source(base).fetch_snapshot().await.unwrap_err();
    assert!(matches!(err, SourceError::Transport(_)), "got {err:?}");
}
