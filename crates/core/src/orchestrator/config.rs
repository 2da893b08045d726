//! Orchestrator configuration.

use serde::{Deserialize, Serialize};

/// Configuration for workflow orchestration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Maximum workflows kept in memory at once (0 = unlimited).
    /// When the limit is reached, creating a workflow fails until one is discarded.
    #[serde(default = "default_max_workflows")]
    pub max_workflows: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_workflows: default_max_workflows(),
        }
    }
}

fn default_max_workflows() -> usize {
    64
}
