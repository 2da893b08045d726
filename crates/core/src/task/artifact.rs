//! Single-slot artifact task state machine.
//!
//! ```text
//! Unconfigured --choose_mode--> Configuring --submit--> Submitting --resolve--> Ready | Degraded
//!                                   ^  |                                            |
//!                                   set_input                                      reset
//! Unconfigured <-------------------------------------------------------------------+
//! ```
//!
//! The script task in upload mode skips `Submitting` and becomes `Ready` on submit.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::error::TaskError;
use super::types::{Mode, ScriptBody, TaskId, TaskInput, TaskKind, TaskResult, TaskStatus};

/// What `submit` decided to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitStep {
    /// The task moved to `Submitting`; exactly one remote call must be issued
    /// for this attempt.
    Dispatch { attempt: u32 },
    /// A request is already outstanding; nothing was dispatched.
    AlreadyInFlight,
    /// The task resolved locally without a remote call.
    Completed,
}

/// How an outstanding request settled.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The collaborator's payload.
    Success(TaskResult),
    /// A placeholder substituted after a failed call.
    Fallback(TaskResult),
}

/// One artifact-producing task.
///
/// Invariant: `result` is present if and only if `status` is `Ready` or `Degraded`.
#[derive(Debug, Clone)]
pub struct ArtifactTask {
    id: TaskId,
    mode: Mode,
    input: Option<TaskInput>,
    status: TaskStatus,
    result: Option<TaskResult>,
    attempt: u32,
    updated_at: DateTime<Utc>,
}

impl ArtifactTask {
    /// Create a task in `Unconfigured`.
    pub fn new(id: TaskId) -> Self {
        Self {
            id,
            mode: Mode::Unset,
            input: None,
            status: TaskStatus::Unconfigured,
            result: None,
            attempt: 0,
            updated_at: Utc::now(),
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn kind(&self) -> TaskKind {
        self.id.kind()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn input(&self) -> Option<&TaskInput> {
        self.input.as_ref()
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn result(&self) -> Option<&TaskResult> {
        self.result.as_ref()
    }

    /// Number of requests dispatched for this task so far.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns true if the task holds an artifact usable by later steps.
    pub fn is_available(&self) -> bool {
        self.status.is_available()
    }

    /// Returns true if the held artifact is a placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.status == TaskStatus::Degraded
    }

    /// Description text, when the task was configured from a description.
    pub fn description(&self) -> Option<&str> {
        match self.mode {
            Mode::ByDescription => self.input.as_ref().and_then(TaskInput::as_text),
            _ => None,
        }
    }

    /// Choose how the artifact is produced.
    ///
    /// Allowed from `Unconfigured` and `Configuring`; switching mode while
    /// configuring discards the previous input.
    pub fn choose_mode(&mut self, mode: Mode) -> Result<(), TaskError> {
        self.require(&[TaskStatus::Unconfigured, TaskStatus::Configuring], "choose mode for")?;

        if !self.kind().supports(mode) {
            return Err(TaskError::InvalidMode {
                task: self.id,
                mode,
            });
        }

        self.mode = mode;
        self.input = None;
        self.transition(TaskStatus::Configuring);
        Ok(())
    }

    /// Store (or overwrite) the input.
    pub fn set_input(&mut self, input: TaskInput) -> Result<(), TaskError> {
        self.require(&[TaskStatus::Configuring], "set input for")?;

        let expected = self
            .kind()
            .expected_input(self.mode)
            .ok_or(TaskError::InvalidMode {
                task: self.id,
                mode: self.mode,
            })?;
        if input.shape() != expected {
            return Err(TaskError::InputMismatch {
                task: self.id,
                mode: self.mode,
                expected,
            });
        }

        self.input = Some(input);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Submit the configured input.
    pub fn submit(&mut self) -> Result<SubmitStep, TaskError> {
        match self.status {
            TaskStatus::Submitting => return Ok(SubmitStep::AlreadyInFlight),
            TaskStatus::Configuring => {}
            status => {
                return Err(TaskError::InvalidTransition {
                    task: self.id,
                    operation: "submit",
                    status,
                })
            }
        }

        let input = match &self.input {
            Some(input) if !input.is_empty() => input,
            _ => return Err(TaskError::MissingInput(self.id)),
        };

        // Pasted scripts need no generation.
        if self.kind() == TaskKind::Script && self.mode == Mode::ByUpload {
            if let TaskInput::Text(text) = input {
                self.result = Some(TaskResult::Script(ScriptBody::Text(text.clone())));
                self.transition(TaskStatus::Ready);
                return Ok(SubmitStep::Completed);
            }
        }

        Ok(self.dispatch())
    }

    /// Start a derived task (the video), which takes no user input.
    pub fn start_derived(&mut self) -> Result<SubmitStep, TaskError> {
        match self.status {
            TaskStatus::Submitting => Ok(SubmitStep::AlreadyInFlight),
            TaskStatus::Unconfigured if self.kind() == TaskKind::Video => Ok(self.dispatch()),
            status => Err(TaskError::InvalidTransition {
                task: self.id,
                operation: "start",
                status,
            }),
        }
    }

    /// Apply the outcome of the request dispatched as `attempt`.
    ///
    /// Returns false (and changes nothing) when the task is no longer waiting
    /// on that attempt.
    pub fn resolve(&mut self, attempt: u32, resolution: Resolution) -> bool {
        if self.status != TaskStatus::Submitting || attempt != self.attempt {
            debug!(
                task = %self.id,
                attempt,
                current_attempt = self.attempt,
                status = %self.status,
                "Discarding stale resolution"
            );
            return false;
        }

        let (status, result) = match resolution {
            Resolution::Success(result) => (TaskStatus::Ready, result),
            Resolution::Fallback(result) => (TaskStatus::Degraded, result),
        };
        self.result = Some(result);
        self.transition(status);
        true
    }

    /// Return an available task to `Unconfigured`, clearing mode, input and result.
    pub fn reset(&mut self) -> Result<(), TaskError> {
        self.require(&[TaskStatus::Ready, TaskStatus::Degraded], "reset")?;

        self.mode = Mode::Unset;
        self.input = None;
        self.result = None;
        self.transition(TaskStatus::Unconfigured);
        Ok(())
    }

    fn dispatch(&mut self) -> SubmitStep {
        self.attempt += 1;
        self.transition(TaskStatus::Submitting);
        SubmitStep::Dispatch {
            attempt: self.attempt,
        }
    }

    fn require(&self, allowed: &[TaskStatus], operation: &'static str) -> Result<(), TaskError> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(TaskError::InvalidTransition {
                task: self.id,
                operation,
                status: self.status,
            })
        }
    }

    fn transition(&mut self, to: TaskStatus) {
        debug!(task = %self.id, from = %self.status, to = %to, "Task transition");
        self.status = to;
        self.updated_at = Utc::now();
    }

    /// Build a task sitting in `status`, with whatever input and result that status implies.
    #[cfg(test)]
    pub(crate) fn in_status(id: TaskId, status: TaskStatus) -> Self {
        use super::types::{ImageRef, VideoMarker};

        assert!(
            !(id.kind() == TaskKind::Video && status == TaskStatus::Configuring),
            "video task is never Configuring"
        );

        let mut task = Self::new(id);
        if status == TaskStatus::Unconfigured {
            return task;
        }
        if id.kind() == TaskKind::Video {
            task.status = TaskStatus::Submitting;
            task.attempt = 1;
        } else {
            task.mode = Mode::ByDescription;
            task.input = Some(TaskInput::text("fixture"));
            task.status = TaskStatus::Configuring;
            if status == TaskStatus::Configuring {
                return task;
            }
            task.status = TaskStatus::Submitting;
            task.attempt = 1;
        }
        if status == TaskStatus::Submitting {
            return task;
        }

        let result = match id.kind() {
            TaskKind::Character => TaskResult::Image(ImageRef::new("fixture.png")),
            TaskKind::Script => TaskResult::Script(ScriptBody::text("fixture")),
            TaskKind::Video => TaskResult::Video(VideoMarker::default()),
        };
        let resolution = if status == TaskStatus::Ready {
            Resolution::Success(result)
        } else {
            Resolution::Fallback(result)
        };
        task.resolve(1, resolution);
        task
    }
}
