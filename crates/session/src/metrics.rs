use once_cell::sync::Lazy;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
struct Counters {
    polls_issued: AtomicU64,
    polls_applied: AtomicU64,
    polls_discarded: AtomicU64,
    transport_errors: AtomicU64,
    records_skipped: AtomicU64,
    unknown_statuses: AtomicU64,
    chart_constructs: AtomicU64,
    chart_destroys: AtomicU64,
}

static COUNTERS: Lazy<Counters> = Lazy::new(Counters::default);

fn increment(counter: &AtomicU64) {
    add(counter, 1);
}

fn add(counter: &AtomicU64, value: u64) {
    counter.fetch_add(value, Ordering::Relaxed);
}

pub fn record_poll_issued() {
    increment(&COUNTERS.polls_issued);
}

pub fn record_poll_applied() {
    increment(&COUNTERS.polls_applied);
}

pub fn record_poll_discarded() {
    increment(&COUNTERS.polls_discarded);
}

pub fn record_transport_error() {
    increment(&COUNTERS.transport_errors);
}

pub fn record_skipped(count: usize) {
    add(&COUNTERS.records_skipped, count as u64);
}

pub fn record_unknown_status() {
    increment(&COUNTERS.unknown_statuses);
}

pub fn record_chart_construct() {
    increment(&COUNTERS.chart_constructs);
}

pub fn record_chart_destroy() {
    increment(&COUNTERS.chart_destroys);
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct SessionMetricsSnapshot {
    pub polls_issued: u64,
    pub polls_applied: u64,
    pub polls_discarded: u64,
    pub transport_errors: u64,
    pub records_skipped: u64,
    pub unknown_statuses: u64,
    pub chart_constructs: u64,
    pub chart_destroys: u64,
}

pub fn snapshot() -> SessionMetricsSnapshot {
    SessionMetricsSnapshot {
        polls_issued: COUNTERS.polls_issued.load(Ordering::Relaxed),
        polls_applied: COUNTERS.polls_applied.load(Ordering::Relaxed),
        polls_discarded: COUNTERS.polls_discarded.load(Ordering::Relaxed),
        transport_errors: COUNTERS.transport_errors.load(Ordering::Relaxed),
        records_skipped: COUNTERS.records_skipped.load(Ordering::Relaxed),
        unknown_statuses: COUNTERS.unknown_statuses.load(Ordering::Relaxed),
        chart_constructs: COUNTERS.chart_constructs.load(Ordering::Relaxed),
        chart_destroys: COUNTERS.chart_destroys.load(Ordering::Relaxed),
    }
}
