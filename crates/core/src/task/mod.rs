//! Artifact tasks: the unit of work tracked by the workflow.

mod artifact;
mod error;
mod types;

pub use artifact::{ArtifactTask, Resolution, SubmitStep};
pub use error::TaskError;
pub use types::{
    ImageRef, ImageUpload, InputShape, Mode, ScriptBody, TaskId, TaskInput, TaskKind, TaskResult,
    TaskStatus, VideoMarker,
};
