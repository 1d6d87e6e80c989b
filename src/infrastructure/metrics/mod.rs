//! Prometheus Metrics Module
//!
//! Provides application-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - HTTP request counts and latency by method, route, and status
//! - Login attempts and registrations by outcome
//! - Session lifecycle transitions
//! - Event operations by outcome
//! - Asset upload latency

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

const NAMESPACE: &str = "event_manager";

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// HTTP request counter - tracks total requests by method, route, and status code
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests").namespace(NAMESPACE),
        &["method", "path", "status"],
    )
    .expect("Failed to create HTTP_REQUESTS_TOTAL metric")
});

/// HTTP request latency histogram - tracks request duration in seconds
pub static HTTP_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];
    HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        )
        .namespace(NAMESPACE)
        .buckets(buckets),
        &["method", "path"],
    )
    .expect("Failed to create HTTP_REQUEST_DURATION_SECONDS metric")
});

/// Login attempts by outcome ("success", "invalid_credentials", "error")
pub static LOGIN_ATTEMPTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("login_attempts_total", "Login attempts by outcome").namespace(NAMESPACE),
        &["outcome"],
    )
    .expect("Failed to create LOGIN_ATTEMPTS_TOTAL metric")
});

/// Registrations by outcome ("success", "validation", "duplicate", "error")
pub static REGISTRATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("registrations_total", "Registration attempts by outcome").namespace(NAMESPACE),
        &["outcome"],
    )
    .expect("Failed to create REGISTRATIONS_TOTAL metric")
});

/// Session transitions ("created", "resolved", "rejected", "destroyed")
pub static SESSION_TRANSITIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("session_transitions_total", "Session lifecycle transitions")
            .namespace(NAMESPACE),
        &["transition"],
    )
    .expect("Failed to create SESSION_TRANSITIONS_TOTAL metric")
});

/// Event operations by operation and outcome
pub static EVENT_OPERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("event_operations_total", "Event operations by outcome").namespace(NAMESPACE),
        &["operation", "outcome"],
    )
    .expect("Failed to create EVENT_OPERATIONS_TOTAL metric")
});

/// Asset upload latency histogram
pub static UPLOAD_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0];
    HistogramVec::new(
        HistogramOpts::new("upload_duration_seconds", "Asset upload latency in seconds")
            .namespace(NAMESPACE)
            .buckets(buckets),
        &["outcome"],
    )
    .expect("Failed to create UPLOAD_DURATION_SECONDS metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .expect("Failed to register HTTP_REQUESTS_TOTAL");
    registry
        .register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()))
        .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");
    registry
        .register(Box::new(LOGIN_ATTEMPTS_TOTAL.clone()))
        .expect("Failed to register LOGIN_ATTEMPTS_TOTAL");
    registry
        .register(Box::new(REGISTRATIONS_TOTAL.clone()))
        .expect("Failed to register REGISTRATIONS_TOTAL");
    registry
        .register(Box::new(SESSION_TRANSITIONS_TOTAL.clone()))
        .expect("Failed to register SESSION_TRANSITIONS_TOTAL");
    registry
        .register(Box::new(EVENT_OPERATIONS_TOTAL.clone()))
        .expect("Failed to register EVENT_OPERATIONS_TOTAL");
    registry
        .register(Box::new(UPLOAD_DURATION_SECONDS.clone()))
        .expect("Failed to register UPLOAD_DURATION_SECONDS");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Helper to record HTTP request metrics
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration_secs);
}

pub fn record_login(outcome: &str) {
    LOGIN_ATTEMPTS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn record_registration(outcome: &str) {
    REGISTRATIONS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn record_session(transition: &str) {
    SESSION_TRANSITIONS_TOTAL.with_label_values(&[transition]).inc();
}

pub fn record_event_operation(operation: &str, outcome: &str) {
    EVENT_OPERATIONS_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();
}

pub fn record_upload(outcome: &str, duration_secs: f64) {
    UPLOAD_DURATION_SECONDS
        .with_label_values(&[outcome])
        .observe(duration_secs);
}
