//! Workflow orchestrator.
//!
//! Owns the four artifact tasks of one podcast workflow and is their only writer:
//! - **Configuration**: mode and input changes are applied synchronously
//! - **Generation**: each submit dispatches one request on the tokio runtime;
//!   the task resumes when that request settles
//! - **Video**: started only when the dependency gate is open

mod config;
mod runner;
mod state;
mod types;

pub use config::OrchestratorConfig;
pub use runner::Orchestrator;
pub use state::WorkflowState;
pub use types::{OrchestratorError, OrchestratorStatus, WorkflowUpdateCallback};
