pub mod config;
pub mod gate;
pub mod generator;
pub mod metrics;
pub mod orchestrator;
pub mod placeholder;
pub mod script;
pub mod task;
pub mod testing;

pub use config::{
    config_path, load_config, load_config_from_str, validate_config, Config, ConfigError,
    SanitizedConfig, SanitizedGeneratorConfig, ServerConfig,
};
pub use generator::{
    CharacterProfile, GenerationError, GenerationRequest, GenerationService, GeneratorConfig,
    HttpGenerationClient, ScriptRequest, VideoCharacter, VideoRequest,
};
pub use orchestrator::{
    Orchestrator, OrchestratorConfig, OrchestratorError, OrchestratorStatus, WorkflowState,
    WorkflowUpdateCallback,
};
pub use placeholder::{PlaceholderConfig, PlaceholderPolicy};
pub use script::{DialogueLine, DialogueScript, ScriptView};
pub use task::{
    ArtifactTask, ImageRef, ImageUpload, InputShape, Mode, Resolution, ScriptBody, SubmitStep,
    TaskError, TaskId, TaskInput, TaskKind, TaskResult, TaskStatus, VideoMarker,
};
