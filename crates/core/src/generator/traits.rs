//! Generation service trait.

use async_trait::async_trait;

use crate::task::{ImageRef, ImageUpload, ScriptBody, TaskResult, VideoMarker};

use super::types::{GenerationError, GenerationRequest, ScriptRequest, VideoRequest};

/// Trait for remote generation backends.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Backend name (e.g., "http", "mock").
    fn name(&self) -> &str;

    /// Generate a portrait from a free-text description.
    async fn generate_character(&self, description: &str) -> Result<ImageRef, GenerationError>;

    /// Process an uploaded portrait; the returned reference may point to a re-processed image.
    async fn process_upload(&self, upload: &ImageUpload) -> Result<ImageRef, GenerationError>;

    /// Write a dialogue script for two characters.
    async fn generate_script(&self, request: &ScriptRequest) -> Result<ScriptBody, GenerationError>;

    /// Render the podcast video.
    async fn generate_video(&self, request: &VideoRequest) -> Result<VideoMarker, GenerationError>;

    /// Execute a request and wrap the payload as a task result.
    async fn execute(&self, request: &GenerationRequest) -> Result<TaskResult, GenerationError> {
        match request {
            GenerationRequest::Character { description } => self
                .generate_character(description)
                .await
                .map(TaskResult::Image),
            GenerationRequest::Upload(upload) => {
                self.process_upload(upload).await.map(TaskResult::Image)
            }
            GenerationRequest::Script(script) => {
                self.generate_script(script).await.map(TaskResult::Script)
            }
            GenerationRequest::Video(video) => {
                self.generate_video(video).await.map(TaskResult::Video)
            }
        }
    }
}
