//! Mock generation service for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};

use crate::generator::{
    GenerationError, GenerationRequest, GenerationService, ScriptRequest, VideoRequest,
};
use crate::task::{ImageRef, ImageUpload, ScriptBody, VideoMarker};

/// Mock implementation of the GenerationService trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable payloads per request kind
/// - Record every request for assertions
/// - Fail per request kind, once or always
/// - Hold requests in flight until released
///
/// Failure and payload settings are keyed by [`GenerationRequest::label`]:
/// `"character"`, `"upload"`, `"script"` or `"video"`.
///
/// # Example
///
/// ```rust,ignore
/// use posecast_core::testing::MockGenerator;
///
/// let generator = MockGenerator::new();
/// generator.fail_next("script").await;
/// generator.hold_requests().await;
///
/// // ... submit tasks; they stay Submitting ...
///
/// generator.release().await;
/// assert_eq!(generator.calls_for("script").await, 1);
/// ```
pub struct MockGenerator {
    character_image: Arc<RwLock<ImageRef>>,
    upload_image: Arc<RwLock<ImageRef>>,
    script: Arc<RwLock<ScriptBody>>,
    video: Arc<RwLock<VideoMarker>>,
    /// Requests in arrival order, recorded before any hold or delay.
    calls: Arc<RwLock<Vec<GenerationRequest>>>,
    /// Labels whose next request fails.
    fail_once: Arc<RwLock<HashSet<String>>>,
    /// Labels whose requests always fail.
    fail_always: Arc<RwLock<HashSet<String>>>,
    delay: Arc<RwLock<Option<Duration>>>,
    hold: watch::Sender<bool>,
}

impl std::fmt::Debug for MockGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockGenerator")
            .field("calls", &"<calls>")
            .field("fail_once", &"<fail_once>")
            .field("fail_always", &"<fail_always>")
            .field("held", &*self.hold.borrow())
            .finish()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGenerator {
    /// Create a mock generator that succeeds immediately with stock payloads.
    pub fn new() -> Self {
        let (hold, _) = watch::channel(false);
        Self {
            character_image: Arc::new(RwLock::new(ImageRef::new(
                "https://mock.generator/character.png",
            ))),
            upload_image: Arc::new(RwLock::new(ImageRef::new(
                "https://mock.generator/upload.png",
            ))),
            script: Arc::new(RwLock::new(ScriptBody::Document(
                super::fixtures::dialogue_document(),
            ))),
            video: Arc::new(RwLock::new(VideoMarker {
                url: Some("https://mock.generator/podcast.mp4".to_string()),
                placeholder: false,
            })),
            calls: Arc::new(RwLock::new(Vec::new())),
            fail_once: Arc::new(RwLock::new(HashSet::new())),
            fail_always: Arc::new(RwLock::new(HashSet::new())),
            delay: Arc::new(RwLock::new(None)),
            hold,
        }
    }

    /// Set the image returned by description-based character generation.
    pub async fn set_character_image(&self, image: ImageRef) {
        *self.character_image.write().await = image;
    }

    /// Set the image returned for uploaded portraits.
    pub async fn set_upload_image(&self, image: ImageRef) {
        *self.upload_image.write().await = image;
    }

    /// Set the script body returned by script generation.
    pub async fn set_script(&self, script: ScriptBody) {
        *self.script.write().await = script;
    }

    /// Set the marker returned by video generation.
    pub async fn set_video(&self, video: VideoMarker) {
        *self.video.write().await = video;
    }

    /// Make the next request with this label fail.
    pub async fn fail_next(&self, label: &str) {
        self.fail_once.write().await.insert(label.to_string());
    }

    /// Make every request with this label fail.
    pub async fn fail_always(&self, label: &str) {
        self.fail_always.write().await.insert(label.to_string());
    }

    /// Clear all configured failures.
    pub async fn clear_failures(&self) {
        self.fail_once.write().await.clear();
        self.fail_always.write().await.clear();
    }

    /// Delay every response by `delay`.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Keep subsequent requests in flight until [`release`](Self::release) is called.
    pub async fn hold_requests(&self) {
        self.hold.send_replace(true);
    }

    /// Let held requests complete.
    pub async fn release(&self) {
        self.hold.send_replace(false);
    }

    /// All recorded requests.
    pub async fn recorded_calls(&self) -> Vec<GenerationRequest> {
        self.calls.read().await.clone()
    }

    /// Total number of requests received.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    /// Number of requests received with this label.
    pub async fn calls_for(&self, label: &str) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|call| call.label() == label)
            .count()
    }

    /// Clear recorded requests.
    pub async fn clear_recorded(&self) {
        self.calls.write().await.clear();
    }

    /// Record the request, honor hold and delay, then check for a scripted failure.
    async fn handle(&self, request: GenerationRequest) -> Result<(), GenerationError> {
        let label = request.label();
        self.calls.write().await.push(request);

        let mut held = self.hold.subscribe();
        // The sender lives as long as the mock, so this only errors after drop.
        let _ = held.wait_for(|held| !*held).await;

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_once.write().await.remove(label)
            || self.fail_always.read().await.contains(label)
        {
            return Err(GenerationError::Api {
                status: 500,
                message: format!("mock {} failure", label),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl GenerationService for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate_character(&self, description: &str) -> Result<ImageRef, GenerationError> {
        self.handle(GenerationRequest::Character {
            description: description.to_string(),
        })
        .await?;
        Ok(self.character_image.read().await.clone())
    }

    async fn process_upload(&self, upload: &ImageUpload) -> Result<ImageRef, GenerationError> {
        self.handle(GenerationRequest::Upload(upload.clone())).await?;
        Ok(self.upload_image.read().await.clone())
    }

    async fn generate_script(&self, request: &ScriptRequest) -> Result<ScriptBody, GenerationError> {
        self.handle(GenerationRequest::Script(request.clone())).await?;
        Ok(self.script.read().await.clone())
    }

    async fn generate_video(&self, request: &VideoRequest) -> Result<VideoMarker, GenerationError> {
        self.handle(GenerationRequest::Video(request.clone())).await?;
        Ok(self.video.read().await.clone())
    }
}
