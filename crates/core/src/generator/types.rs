//! Request types and errors for the generation service.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::task::{ImageRef, ImageUpload, ScriptBody};

/// Error type for generation calls.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Not configured")]
    NotConfigured,
}

/// A podcast host as described to the script writer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CharacterProfile {
    pub name: String,
    pub description: String,
}

/// Input for script generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRequest {
    pub characters: [CharacterProfile; 2],
    /// What the episode should be about.
    pub topic: String,
}

/// A character as handed to video synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoCharacter {
    pub id: u8,
    pub image: ImageRef,
    pub description: Option<String>,
}

/// Input for video synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRequest {
    pub characters: [VideoCharacter; 2],
    pub script: ScriptBody,
}

/// A single outstanding call, built from workflow state at dispatch time.
#[derive(Debug, Clone)]
pub enum GenerationRequest {
    Character { description: String },
    Upload(ImageUpload),
    Script(ScriptRequest),
    Video(VideoRequest),
}

impl GenerationRequest {
    /// Short name used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            GenerationRequest::Character { .. } => "character",
            GenerationRequest::Upload(_) => "upload",
            GenerationRequest::Script(_) => "script",
            GenerationRequest::Video(_) => "video",
        }
    }
}
