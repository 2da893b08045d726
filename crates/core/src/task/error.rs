//! Task transition errors.

use thiserror::Error;

use super::types::{InputShape, Mode, TaskId, TaskStatus};

/// Precondition violations on task transitions.
///
/// These are reported to the caller synchronously and never stored in task state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskError {
    /// The mode is not supported for this kind of task.
    #[error("mode {mode} is not supported by task {task}")]
    InvalidMode { task: TaskId, mode: Mode },

    /// Submission requires a non-empty input.
    #[error("task {0} has no input to submit")]
    MissingInput(TaskId),

    /// The input shape does not match the chosen mode.
    #[error("task {task} in mode {mode} expects {expected} input")]
    InputMismatch {
        task: TaskId,
        mode: Mode,
        expected: InputShape,
    },

    /// The operation is not allowed from the task's current status.
    #[error("cannot {operation} task {task}: current status is {status}")]
    InvalidTransition {
        task: TaskId,
        operation: &'static str,
        status: TaskStatus,
    },
}
