use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use once_cell::sync::{Lazy, OnceCell};
use pathscope_session::metrics::{self as session_metrics, SessionMetricsSnapshot};
use prometheus::{core::Collector, opts, Encoder, IntGaugeVec, Registry, TextEncoder};
use tokio::{net::TcpListener, task::JoinHandle};
use tracing::{error, info};

use crate::errors::{CliError, CliResult};

static GLOBAL_REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);
static REGISTER_ONCE: OnceCell<()> = OnceCell::new();

static SESSION_EVENTS: Lazy<Option<IntGaugeVec>> = Lazy::new(|| {
    IntGaugeVec::new(
        opts!(
            "pathscope_session_events",
            "Session driver events since process start, grouped by event"
        ),
        &["event"],
    )
    .map_err(|err| error!(?err, "failed to build session metric"))
    .ok()
});

type Reader = fn(&SessionMetricsSnapshot) -> u64;

const SESSION_EVENT_READERS: &[(&str, Reader)] = &[
    ("poll_issued", |s: &SessionMetricsSnapshot| s.polls_issued),
    ("poll_applied", |s: &SessionMetricsSnapshot| s.polls_applied),
    ("poll_discarded", |s: &SessionMetricsSnapshot| s.polls_discarded),
    ("transport_error", |s: &SessionMetricsSnapshot| s.transport_errors),
    ("record_skipped", |s: &SessionMetricsSnapshot| s.records_skipped),
    ("unknown_status", |s: &SessionMetricsSnapshot| s.unknown_statuses),
    ("chart_construct", |s: &SessionMetricsSnapshot| s.chart_constructs),
    ("chart_destroy", |s: &SessionMetricsSnapshot| s.chart_destroys),
];

fn register<C>(registry: &Registry, collector: C)
where
    C: Collector + Clone + Send + Sync + 'static,
{
    if let Err(err) = registry.register(Box::new(collector.clone())) {
        if !matches!(err, prometheus::Error::AlreadyReg) {
            error!(?err, "failed to register session metric");
        }
    }
}

pub fn register_metrics() {
    REGISTER_ONCE.get_or_init(|| {
        if let Some(events) = SESSION_EVENTS.as_ref() {
            register(global_registry(), events.clone());
        }
    });
}

/// Copies the session crate's counters into the prometheus gauges.
pub fn refresh_session_metrics() {
    let Some(events) = SESSION_EVENTS.as_ref() else {
        return;
    };
    let snapshot = session_metrics::snapshot();
    for &(event, read) in SESSION_EVENT_READERS {
        let value = i64::try_from(read(&snapshot)).unwrap_or(i64::MAX);
        events.with_label_values(&[event]).set(value);
    }
}

pub fn gather_text() -> CliResult<String> {
    register_metrics();
    refresh_session_metrics();
    encode(global_registry())
}

fn encode(registry: &Registry) -> CliResult<String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&registry.gather(), &mut buffer)
        .map_err(|err| CliError::Metrics(err.to_string()))?;
    String::from_utf8(buffer).map_err(|err| CliError::Metrics(err.to_string()))
}

pub fn spawn_metrics_server(port: u16) -> Option<JoinHandle<()>> {
    if port == 0 {
        return None;
    }

    register_metrics();
    let registry = Arc::new(global_registry().clone());
    let app = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(registry);

    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    info!(%addr, "metrics server listening");
    Some(tokio::spawn(async move {
        match TcpListener::bind(addr).await {
            Ok(listener) => {
                if let Err(err) = axum::serve(listener, app.into_make_service()).await {
                    error!(?err, "metrics server exited with error");
                }
            }
            Err(err) => {
                error!(?err, "failed to bind metrics listener");
            }
        }
    }))
}

async fn metrics_handler(State(registry): State<Arc<Registry>>) -> Response {
    refresh_session_metrics();
    let body = match encode(&registry) {
        Ok(body) => body,
        Err(err) => {
            error!(%err, "failed to encode prometheus metrics");
            return (StatusCode::INTERNAL_SERVER_ERROR, "metric encode error").into_response();
        }
    };
    match HeaderValue::from_str(TextEncoder::new().format_type()) {
        Ok(value) => ([(header::CONTENT_TYPE, value)], body).into_response(),
        Err(err) => {
            error!(?err, "failed to build content-type header");
            (StatusCode::INTERNAL_SERVER_ERROR, "metric encode error").into_response()
        }
    }
}

pub fn global_registry() -> &'static Registry {
    &GLOBAL_REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exported_text_lists_every_session_event() {
        session_metrics::record_poll_issued();
        let text = gather_text().unwrap();
        for (event, _) in SESSION_EVENT_READERS {
            assert!(
                text.contains(&format!("pathscope_session_events{{event=\"{event}\"}}")),
                "missing {event} in\n{text}"
            );
        }
    }

    #[test]
    fn registering_twice_is_harmless() {
        register_metrics();
        register_metrics();
        if let Some(events) = SESSION_EVENTS.as_ref() {
            register(global_registry(), events.clone());
        }
        assert!(gather_text().is_ok());
    }

    #[test]
    fn disabled_port_spawns_nothing() {
        assert!(spawn_metrics_server(0).is_none());
    }
}
