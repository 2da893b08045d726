//! Types for the workflow orchestrator.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::task::{TaskError, TaskId, TaskStatus};

/// Errors returned by orchestrator operations.
///
/// Remote generation failures never appear here; they degrade the task instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrchestratorError {
    /// A transition precondition was violated.
    #[error(transparent)]
    Task(#[from] TaskError),

    /// The video was requested before all prerequisites were available.
    #[error("video cannot start: waiting on {}", join_ids(.blocking))]
    GateNotOpen { blocking: Vec<TaskId> },
}

fn join_ids(ids: &[TaskId]) -> String {
    ids.iter()
        .map(TaskId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Callback invoked after every applied transition.
pub type WorkflowUpdateCallback = Arc<dyn Fn(TaskId, TaskStatus) + Send + Sync>;

/// Current status of a workflow.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrchestratorStatus {
    pub unconfigured: usize,
    pub configuring: usize,
    /// Tasks with a request in flight.
    pub submitting: usize,
    pub ready: usize,
    pub degraded: usize,
    /// Whether the dependency gate is open right now.
    pub can_start_video: bool,
}
