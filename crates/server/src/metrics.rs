//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the posecast server:
//! - HTTP request metrics (latency, counts)
//! - Workflow session counts
//! - Task counts by status (collected dynamically)

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts,
    Registry, TextEncoder,
};

use posecast_core::TaskStatus;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "posecast_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("posecast_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "posecast_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Workflow Metrics
// =============================================================================

/// Workflow sessions currently held in memory.
pub static WORKFLOWS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "posecast_workflows_active",
        "Number of workflow sessions currently held",
    )
    .unwrap()
});

/// Workflow sessions created since startup.
pub static WORKFLOWS_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "posecast_workflows_created_total",
        "Total workflow sessions created since startup",
    )
    .unwrap()
});

/// Tasks by current status across all workflows (collected dynamically).
pub static TASKS_BY_STATUS: Lazy<IntGaugeVec> = Lazy::new(|| {
    IntGaugeVec::new(
        Opts::new("posecast_tasks_by_status", "Current task count by status"),
        &["status"],
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Workflows
    registry
        .register(Box::new(WORKFLOWS_ACTIVE.clone()))
        .unwrap();
    registry
        .register(Box::new(WORKFLOWS_CREATED_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(TASKS_BY_STATUS.clone()))
        .unwrap();

    // Core metrics (dispatches, resolutions, gate)
    for metric in posecast_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

/// Collect dynamic metrics from current application state.
///
/// Called before encoding so the gauges reflect the workflows held right now.
pub async fn collect_dynamic_metrics(state: &crate::state::AppState) {
    let workflows = state.workflows().await;
    WORKFLOWS_ACTIVE.set(workflows.len() as i64);

    let mut counts = [0i64; TaskStatus::ALL.len()];
    for workflow in &workflows {
        let snapshot = workflow.snapshot().await;
        for task in snapshot.tasks() {
            if let Some(index) = TaskStatus::ALL.iter().position(|s| *s == task.status()) {
                counts[index] += 1;
            }
        }
    }

    for (status, count) in TaskStatus::ALL.iter().zip(counts) {
        TASKS_BY_STATUS
            .with_label_values(&[status.as_str()])
            .set(count);
    }
}

/// Normalize a path for metric labels (replace IDs with placeholders).
pub fn normalize_path(path: &str) -> String {
    UUID_SEGMENT.replace_all(path, "{id}").into_owned()
}

static UUID_SEGMENT: Lazy<regex_lite::Regex> = Lazy::new(|| {
    regex_lite::Regex::new(
        r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}",
    )
    .unwrap()
});
