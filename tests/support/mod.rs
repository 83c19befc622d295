//! Fake monitor backend serving the HTTP API on an ephemeral port.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use url::Url;

#[derive(Default)]
pub struct Backend {
    pub running: bool,
    pub completed: bool,
    pub polls: usize,
    pub stats_requests: usize,
    /// Polls served while running before the run reports completion.
    pub complete_after: Option<usize>,
    pub toggles: usize,
    pub history: Vec<Value>,
    pub fail_stats: bool,
}

pub type Shared = Arc<Mutex<Backend>>;

pub fn packet(sequence: u64, timestamp: i64, path: Option<&str>, kind: &str) -> Value {
    json!({
        "sequence": sequence,
        "timestamp": timestamp,
        "path": path,
        "size": 1024,
        "type": kind,
        "status": "sent",
    })
}

fn stats_body(backend: &Backend) -> Value {
    let status = if backend.completed {
        "completed"
    } else if backend.running {
        "running"
    } else {
        "idle"
    };
    // One more packet on each path per poll while running.
    let mut packets = Vec::new();
    if backend.running || backend.completed {
        for n in 0..backend.polls as u64 {
            let ts = 1_000 + n as i64 * 100;
            packets.push(packet(n, ts, Some("path1"), "data"));
            packets.push(packet(n, ts + 10, Some("path2"), "data"));
            packets.push(packet(n, ts + 40, None, "ack"));
        }
    }
    json!({
        "compression": { "original_size": 2048, "compressed_size": 1024, "ratio": 50.0 },
        "transmission": { "current_run": 1, "total_runs": 3, "status": status },
        "performance": {
            "total_rtt": 12.5,
            "average_rtt": 4.25,
            "average_throughput": 256.0,
            "average_packet_loss_rate": 0.0
        },
        "paths": {
            "path1": { "packets": backend.polls, "success": backend.polls },
            "path2": { "packets": backend.polls, "success": backend.polls }
        },
        "packets": packets,
    })
}

async fn stats(State(shared): State<Shared>) -> Response {
    let mut backend = shared.lock();
    backend.stats_requests += 1;
    if backend.fail_stats {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    if backend.running {
        backend.polls += 1;
        if backend.complete_after.is_some_and(|limit| backend.polls >= limit) {
            backend.running = false;
            backend.completed = true;
        }
    }
    Json(stats_body(&backend)).into_response()
}

async fn toggle(State(shared): State<Shared>) -> Json<Value> {
    let mut backend = shared.lock();
    backend.toggles += 1;
    if backend.running {
        backend.running = false;
        Json(json!({ "status": "stopping" }))
    } else {
        backend.running = true;
        backend.completed = false;
        backend.polls = 0;
        Json(json!({ "status": "started", "session_id": backend.toggles }))
    }
}

async fn history(State(shared): State<Shared>) -> Json<Value> {
    Json(Value::Array(shared.lock().history.clone()))
}

async fn clear_history(State(shared): State<Shared>) -> Json<Value> {
    shared.lock().history.clear();
    Json(json!({ "status": "cleared" }))
}

pub async fn spawn(backend: Backend) -> (Url, Shared) {
    let shared: Shared = Arc::new(Mutex::new(backend));
    let app = Router::new()
        .route("/api/stats", get(stats))
        .route("/api/transmission/toggle", post(toggle))
        .route("/api/history", get(history))
        .route("/api/history/clear", post(clear_history))
        .with_state(shared.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (Url::parse(&format!("http://{addr}")).unwrap(), shared)
}
