//! Prometheus metrics for the workflow orchestrator.

use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntCounterVec, Opts};

/// Remote requests dispatched, by task.
pub static DISPATCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "posecast_dispatches_total",
            "Total generation requests dispatched",
        ),
        &["task"],
    )
    .unwrap()
});

/// Task resolutions by task and outcome.
pub static RESOLUTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "posecast_resolutions_total",
            "Total task resolutions by outcome",
        ),
        &["task", "outcome"], // "ready", "degraded", "local"
    )
    .unwrap()
});

/// Video start requests rejected because prerequisites were missing.
pub static GATE_REJECTIONS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "posecast_gate_rejections_total",
        "Total video start requests rejected by the dependency gate",
    )
    .unwrap()
});

/// All core metrics, for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(DISPATCHES.clone()),
        Box::new(RESOLUTIONS.clone()),
        Box::new(GATE_REJECTIONS.clone()),
    ]
}
