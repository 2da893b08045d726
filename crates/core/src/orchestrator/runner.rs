//! Workflow orchestrator implementation.
//!
//! All transitions take the state lock, so no two transitions apply to the same
//! task concurrently. The lock is never held across a remote call: dispatch
//! happens on a spawned tokio task that re-takes the lock to apply the outcome.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::generator::{
    CharacterProfile, GenerationRequest, GenerationService, ScriptRequest, VideoCharacter,
    VideoRequest,
};
use crate::metrics::{DISPATCHES, GATE_REJECTIONS, RESOLUTIONS};
use crate::placeholder::PlaceholderPolicy;
use crate::task::{
    ArtifactTask, Mode, Resolution, SubmitStep, TaskId, TaskInput, TaskKind, TaskStatus,
};

use super::state::WorkflowState;
use super::types::{OrchestratorError, OrchestratorStatus, WorkflowUpdateCallback};

/// The workflow orchestrator: sole owner and writer of a [`WorkflowState`].
pub struct Orchestrator {
    state: Arc<Mutex<WorkflowState>>,
    generator: Arc<dyn GenerationService>,
    placeholders: Arc<PlaceholderPolicy>,
    update_callback: Option<WorkflowUpdateCallback>,
}

impl Orchestrator {
    /// Create an orchestrator with every task `Unconfigured`.
    pub fn new(generator: Arc<dyn GenerationService>, placeholders: PlaceholderPolicy) -> Self {
        Self {
            state: Arc::new(Mutex::new(WorkflowState::new())),
            generator,
            placeholders: Arc::new(placeholders),
            update_callback: None,
        }
    }

    /// Set a callback to be invoked after every applied transition.
    pub fn with_update_callback(mut self, callback: WorkflowUpdateCallback) -> Self {
        self.update_callback = Some(callback);
        self
    }

    /// Choose how `id` produces its artifact.
    pub async fn choose_mode(&self, id: TaskId, mode: Mode) -> Result<(), OrchestratorError> {
        {
            let mut state = self.state.lock().await;
            state.task_mut(id).choose_mode(mode)?;
        }
        debug!(task = %id, mode = %mode, "Mode chosen");
        self.notify(id, TaskStatus::Configuring);
        Ok(())
    }

    /// Store or overwrite the input of `id`.
    pub async fn set_input(&self, id: TaskId, input: TaskInput) -> Result<(), OrchestratorError> {
        let mut state = self.state.lock().await;
        state.task_mut(id).set_input(input)?;
        Ok(())
    }

    /// Submit `id`, dispatching at most one remote request.
    pub async fn submit(&self, id: TaskId) -> Result<SubmitStep, OrchestratorError> {
        let mut state = self.state.lock().await;

        let request = if state.task(id).status() == TaskStatus::Configuring {
            Self::build_request(&state, id)
        } else {
            None
        };

        let step = state.task_mut(id).submit()?;
        match step {
            SubmitStep::Dispatch { attempt } => {
                drop(state);
                self.notify(id, TaskStatus::Submitting);
                self.dispatch(id, attempt, request);
            }
            SubmitStep::Completed => {
                let status = state.task(id).status();
                drop(state);
                info!(task = %id, "Task completed without generation");
                RESOLUTIONS
                    .with_label_values(&[id.as_str(), "local"])
                    .inc();
                self.notify(id, status);
            }
            SubmitStep::AlreadyInFlight => {
                debug!(task = %id, "Submit ignored, request already in flight");
            }
        }

        Ok(step)
    }

    /// Return an available task to `Unconfigured`.
    ///
    /// Rejected while a request is in flight.
    pub async fn reset(&self, id: TaskId) -> Result<(), OrchestratorError> {
        {
            let mut state = self.state.lock().await;
            state.task_mut(id).reset()?;
        }
        info!(task = %id, "Task reset");
        self.notify(id, TaskStatus::Unconfigured);
        Ok(())
    }

    /// Start video generation once both characters and the script are available.
    ///
    /// Fails with [`OrchestratorError::GateNotOpen`], leaving every task untouched,
    /// when any prerequisite is still missing.
    pub async fn start_video(&self) -> Result<SubmitStep, OrchestratorError> {
        let mut state = self.state.lock().await;

        if !state.can_start_video() {
            let blocking = state.blocking_tasks();
            GATE_REJECTIONS.inc();
            info!(blocking = ?blocking, "Video start rejected by dependency gate");
            return Err(OrchestratorError::GateNotOpen { blocking });
        }

        let request = Self::build_video_request(&state).map(GenerationRequest::Video);
        let step = state.task_mut(TaskId::Video).start_derived()?;
        drop(state);

        match step {
            SubmitStep::Dispatch { attempt } => {
                self.notify(TaskId::Video, TaskStatus::Submitting);
                self.dispatch(TaskId::Video, attempt, request);
            }
            _ => debug!("Video start ignored, request already in flight"),
        }

        Ok(step)
    }

    /// Whether the video may start right now. Derived on every call.
    pub async fn can_start_video(&self) -> bool {
        self.state.lock().await.can_start_video()
    }

    /// A copy of the current state, for readers.
    pub async fn snapshot(&self) -> WorkflowState {
        self.state.lock().await.clone()
    }

    /// A copy of one task.
    pub async fn task(&self, id: TaskId) -> ArtifactTask {
        self.state.lock().await.task(id).clone()
    }

    /// Per-status task counts plus the gate flag.
    pub async fn status(&self) -> OrchestratorStatus {
        let state = self.state.lock().await;
        let mut status = OrchestratorStatus {
            can_start_video: state.can_start_video(),
            ..Default::default()
        };
        for task in state.tasks() {
            let counter = match task.status() {
                TaskStatus::Unconfigured => &mut status.unconfigured,
                TaskStatus::Configuring => &mut status.configuring,
                TaskStatus::Submitting => &mut status.submitting,
                TaskStatus::Ready => &mut status.ready,
                TaskStatus::Degraded => &mut status.degraded,
            };
            *counter += 1;
        }
        status
    }

    /// Build the remote request for a configured character or script task.
    ///
    /// Returns None when the task needs no remote call.
    fn build_request(state: &WorkflowState, id: TaskId) -> Option<GenerationRequest> {
        let task = state.task(id);
        match (task.kind(), task.mode(), task.input()?) {
            (TaskKind::Character, Mode::ByDescription, TaskInput::Text(description)) => {
                Some(GenerationRequest::Character {
                    description: description.clone(),
                })
            }
            (TaskKind::Character, Mode::ByUpload, TaskInput::Image(upload)) => {
                Some(GenerationRequest::Upload(upload.clone()))
            }
            (TaskKind::Script, Mode::ByDescription, TaskInput::Text(topic)) => {
                Some(GenerationRequest::Script(ScriptRequest {
                    characters: [
                        Self::profile(state.task(TaskId::Character1)),
                        Self::profile(state.task(TaskId::Character2)),
                    ],
                    topic: topic.clone(),
                }))
            }
            _ => None,
        }
    }

    /// Characters configured from an upload are described by their name alone.
    fn profile(task: &ArtifactTask) -> CharacterProfile {
        let name = format!("Character {}", task.id().character_number().unwrap_or(0));
        let description = task
            .description()
            .map(str::to_string)
            .unwrap_or_else(|| name.clone());
        CharacterProfile { name, description }
    }

    fn build_video_request(state: &WorkflowState) -> Option<VideoRequest> {
        let character = |id: TaskId| -> Option<VideoCharacter> {
            let task = state.task(id);
            Some(VideoCharacter {
                id: id.character_number()?,
                image: task.result()?.as_image()?.clone(),
                description: task.description().map(str::to_string),
            })
        };

        Some(VideoRequest {
            characters: [character(TaskId::Character1)?, character(TaskId::Character2)?],
            script: state
                .task(TaskId::Script)
                .result()?
                .as_script()?
                .clone(),
        })
    }

    /// Issue the request for `attempt` and apply its outcome when it settles.
    fn dispatch(&self, id: TaskId, attempt: u32, request: Option<GenerationRequest>) {
        DISPATCHES.with_label_values(&[id.as_str()]).inc();

        let state = Arc::clone(&self.state);
        let generator = Arc::clone(&self.generator);
        let placeholders = Arc::clone(&self.placeholders);
        let callback = self.update_callback.clone();

        tokio::spawn(async move {
            let resolution = match request {
                Some(request) => {
                    info!(
                        task = %id,
                        attempt,
                        request = request.label(),
                        generator = generator.name(),
                        "Dispatching generation request"
                    );
                    match generator.execute(&request).await {
                        Ok(result) => Resolution::Success(result),
                        Err(e) => {
                            warn!(
                                task = %id,
                                attempt,
                                error = %e,
                                "Generation failed, substituting placeholder"
                            );
                            Resolution::Fallback(placeholders.for_task(id))
                        }
                    }
                }
                None => {
                    warn!(task = %id, attempt, "No request could be built, substituting placeholder");
                    Resolution::Fallback(placeholders.for_task(id))
                }
            };

            let outcome = match resolution {
                Resolution::Success(_) => "ready",
                Resolution::Fallback(_) => "degraded",
            };

            let applied = {
                let mut state = state.lock().await;
                let task = state.task_mut(id);
                task.resolve(attempt, resolution).then(|| task.status())
            };

            if let Some(status) = applied {
                info!(task = %id, attempt, status = %status, "Task resolved");
                RESOLUTIONS.with_label_values(&[id.as_str(), outcome]).inc();
                if let Some(callback) = callback {
                    callback(id, status);
                }
            }
        });
    }

    fn notify(&self, id: TaskId, status: TaskStatus) {
        if let Some(callback) = &self.update_callback {
            callback(id, status);
        }
    }
}
