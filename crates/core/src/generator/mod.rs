//! Boundary to the remote generation service.
//!
//! Four request/response contracts (character, upload, script, video). Every
//! failure is reported as a [`GenerationError`]; the orchestrator does not
//! distinguish between them.

mod config;
mod http;
mod traits;
mod types;

pub use config::GeneratorConfig;
pub use http::HttpGenerationClient;
pub use traits::GenerationService;
pub use types::{
    CharacterProfile, GenerationError, GenerationRequest, ScriptRequest, VideoCharacter,
    VideoRequest,
};
