//! Workflow session API endpoints.

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use posecast_core::{
    ArtifactTask, ImageUpload, Mode, Orchestrator, OrchestratorError, ScriptView, SubmitStep,
    TaskError, TaskId, TaskInput, TaskKind, TaskResult, TaskStatus, WorkflowState,
};

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ModeBody {
    pub mode: Mode,
}

#[derive(Debug, Deserialize)]
pub struct TextInputBody {
    pub text: String,
}

/// What the user has supplied so far. Image bytes are never echoed back.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputSummary {
    Text {
        text: String,
    },
    Image {
        file_name: Option<String>,
        size_bytes: usize,
    },
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: TaskId,
    pub kind: TaskKind,
    pub mode: Mode,
    pub status: TaskStatus,
    pub input: Option<InputSummary>,
    pub result: Option<TaskResult>,
    pub is_placeholder: bool,
    pub attempt: u32,
    pub updated_at: DateTime<Utc>,
}

impl From<&ArtifactTask> for TaskResponse {
    fn from(task: &ArtifactTask) -> Self {
        let input = task.input().map(|input| match input {
            TaskInput::Text(text) => InputSummary::Text { text: text.clone() },
            TaskInput::Image(upload) => InputSummary::Image {
                file_name: upload.file_name.clone(),
                size_bytes: upload.bytes.len(),
            },
        });

        Self {
            id: task.id(),
            kind: task.kind(),
            mode: task.mode(),
            status: task.status(),
            input,
            result: task.result().cloned(),
            is_placeholder: task.is_placeholder(),
            attempt: task.attempt(),
            updated_at: task.updated_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WorkflowResponse {
    pub id: String,
    pub tasks: Vec<TaskResponse>,
    pub can_start_video: bool,
    /// Prerequisites still keeping the video gate closed.
    pub blocking: Vec<TaskId>,
    /// The script, interpreted for display, once one is available.
    pub script: Option<ScriptView>,
}

impl WorkflowResponse {
    fn new(id: String, state: &WorkflowState) -> Self {
        let script = state
            .task(TaskId::Script)
            .result()
            .and_then(TaskResult::as_script)
            .map(ScriptView::interpret);

        Self {
            id,
            tasks: state.tasks().into_iter().map(TaskResponse::from).collect(),
            can_start_video: state.can_start_video(),
            blocking: state.blocking_tasks(),
            script,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    #[serde(flatten)]
    pub step: SubmitStep,
    pub task: TaskResponse,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

/// Precondition violations are client errors; wrong-state requests conflict.
fn orchestrator_error(error: OrchestratorError) -> ApiError {
    let status = match &error {
        OrchestratorError::GateNotOpen { .. } => StatusCode::CONFLICT,
        OrchestratorError::Task(TaskError::InvalidTransition { .. }) => StatusCode::CONFLICT,
        OrchestratorError::Task(_) => StatusCode::BAD_REQUEST,
    };
    api_error(status, error.to_string())
}

async fn find_workflow(state: &AppState, id: &str) -> Result<Arc<Orchestrator>, ApiError> {
    state
        .workflow(id)
        .await
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("Workflow not found: {}", id)))
}

fn parse_task(name: &str) -> Result<TaskId, ApiError> {
    TaskId::parse(name)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("Unknown task: {}", name)))
}

async fn snapshot_response(id: String, orchestrator: &Orchestrator) -> Json<WorkflowResponse> {
    let state = orchestrator.snapshot().await;
    Json(WorkflowResponse::new(id, &state))
}

// ============================================================================
// Handlers
// ============================================================================

/// Start a new workflow session
pub async fn create_workflow(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<WorkflowResponse>), ApiError> {
    let (id, orchestrator) = state.create_workflow().await.ok_or_else(|| {
        api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "Workflow limit reached, discard a workflow first",
        )
    })?;

    Ok((
        StatusCode::CREATED,
        snapshot_response(id, &orchestrator).await,
    ))
}

/// Get a workflow snapshot
pub async fn get_workflow(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<WorkflowResponse>, ApiError> {
    let orchestrator = find_workflow(&state, &id).await?;
    Ok(snapshot_response(id, &orchestrator).await)
}

/// Discard a workflow session
pub async fn delete_workflow(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.remove_workflow(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(api_error(
            StatusCode::NOT_FOUND,
            format!("Workflow not found: {}", id),
        ))
    }
}

/// Choose how a task produces its artifact
pub async fn choose_mode(
    State(state): State<Arc<AppState>>,
    Path((id, task)): Path<(String, String)>,
    Json(body): Json<ModeBody>,
) -> Result<Json<WorkflowResponse>, ApiError> {
    let orchestrator = find_workflow(&state, &id).await?;
    let task = parse_task(&task)?;

    orchestrator
        .choose_mode(task, body.mode)
        .await
        .map_err(orchestrator_error)?;

    Ok(snapshot_response(id, &orchestrator).await)
}

/// Set a description, topic or pasted script
pub async fn set_text_input(
    State(state): State<Arc<AppState>>,
    Path((id, task)): Path<(String, String)>,
    Json(body): Json<TextInputBody>,
) -> Result<Json<WorkflowResponse>, ApiError> {
    let orchestrator = find_workflow(&state, &id).await?;
    let task = parse_task(&task)?;

    orchestrator
        .set_input(task, TaskInput::Text(body.text))
        .await
        .map_err(orchestrator_error)?;

    Ok(snapshot_response(id, &orchestrator).await)
}

/// Upload a character portrait (multipart field `image`)
pub async fn set_image_input(
    State(state): State<Arc<AppState>>,
    Path((id, task)): Path<(String, String)>,
    mut multipart: Multipart,
) -> Result<Json<WorkflowResponse>, ApiError> {
    let orchestrator = find_workflow(&state, &id).await?;
    let task = parse_task(&task)?;

    let mut upload: Option<ImageUpload> = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("image") {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;

        let mut image = ImageUpload::new(bytes.to_vec());
        image.file_name = file_name;
        image.content_type = content_type;
        upload = Some(image);
        break;
    }

    let upload = upload
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "Missing multipart field: image"))?;

    orchestrator
        .set_input(task, TaskInput::Image(upload))
        .await
        .map_err(orchestrator_error)?;

    Ok(snapshot_response(id, &orchestrator).await)
}

/// Oversized bodies carry 413, malformed ones 400.
fn multipart_error(e: MultipartError) -> ApiError {
    warn!(error = %e, "Failed to read image upload");
    api_error(e.status(), format!("Failed to read image: {}", e.body_text()))
}

/// Submit a task
pub async fn submit_task(
    State(state): State<Arc<AppState>>,
    Path((id, task)): Path<(String, String)>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    let orchestrator = find_workflow(&state, &id).await?;
    let task = parse_task(&task)?;

    let step = orchestrator
        .submit(task)
        .await
        .map_err(orchestrator_error)?;

    Ok(submit_response(&orchestrator, task, step).await)
}

/// Reset a task back to unconfigured
pub async fn reset_task(
    State(state): State<Arc<AppState>>,
    Path((id, task)): Path<(String, String)>,
) -> Result<Json<WorkflowResponse>, ApiError> {
    let orchestrator = find_workflow(&state, &id).await?;
    let task = parse_task(&task)?;

    orchestrator.reset(task).await.map_err(orchestrator_error)?;

    Ok(snapshot_response(id, &orchestrator).await)
}

/// Start video generation
pub async fn start_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    let orchestrator = find_workflow(&state, &id).await?;

    let step = orchestrator
        .start_video()
        .await
        .map_err(orchestrator_error)?;

    Ok(submit_response(&orchestrator, TaskId::Video, step).await)
}

async fn submit_response(
    orchestrator: &Orchestrator,
    task: TaskId,
    step: SubmitStep,
) -> (StatusCode, Json<SubmitResponse>) {
    let status = match step {
        SubmitStep::Dispatch { .. } => StatusCode::ACCEPTED,
        SubmitStep::AlreadyInFlight | SubmitStep::Completed => StatusCode::OK,
    };
    let task = orchestrator.task(task).await;
    (
        status,
        Json(SubmitResponse {
            step,
            task: TaskResponse::from(&task),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let (status, _) = orchestrator_error(OrchestratorError::GateNotOpen {
            blocking: vec![TaskId::Script],
        });
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = orchestrator_error(OrchestratorError::Task(
            TaskError::InvalidTransition {
                task: TaskId::Script,
                operation: "submit",
                status: TaskStatus::Unconfigured,
            },
        ));
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, Json(body)) =
            orchestrator_error(OrchestratorError::Task(TaskError::MissingInput(TaskId::Character1)));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.contains("character_1"));
    }

    #[test]
    fn test_submit_response_flattens_step() {
        let response = SubmitResponse {
            step: SubmitStep::Dispatch { attempt: 2 },
            task: TaskResponse::from(&ArtifactTask::new(TaskId::Video)),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["outcome"], "dispatch");
        assert_eq!(json["attempt"], 2);
        assert_eq!(json["task"]["id"], "video");
    }

    #[test]
    fn test_image_input_summary_hides_bytes() {
        let summary = InputSummary::Image {
            file_name: Some("portrait.png".to_string()),
            size_bytes: 8,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["type"], "image");
        assert_eq!(json["size_bytes"], 8);
    }
}
