use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use posecast_core::{Config, GenerationService, Orchestrator, PlaceholderPolicy, SanitizedConfig};

use crate::metrics::WORKFLOWS_CREATED_TOTAL;

/// Shared application state
pub struct AppState {
    config: Config,
    generator: Arc<dyn GenerationService>,
    placeholders: PlaceholderPolicy,
    /// In-memory workflow sessions by id. Nothing survives a restart.
    workflows: RwLock<HashMap<String, Arc<Orchestrator>>>,
}

impl AppState {
    pub fn new(config: Config, generator: Arc<dyn GenerationService>) -> Self {
        let placeholders = PlaceholderPolicy::new(config.placeholders.clone());
        Self {
            config,
            generator,
            placeholders,
            workflows: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn generator(&self) -> &dyn GenerationService {
        self.generator.as_ref()
    }

    /// Start a new workflow session.
    ///
    /// Returns None when `max_workflows` sessions are already held.
    pub async fn create_workflow(&self) -> Option<(String, Arc<Orchestrator>)> {
        let mut workflows = self.workflows.write().await;

        let limit = self.config.orchestrator.max_workflows;
        if limit > 0 && workflows.len() >= limit {
            return None;
        }

        let id = Uuid::new_v4().to_string();
        let workflow_id = id.clone();
        let orchestrator = Arc::new(
            Orchestrator::new(Arc::clone(&self.generator), self.placeholders.clone())
                .with_update_callback(Arc::new(move |task, status| {
                    debug!(workflow = %workflow_id, task = %task, status = %status, "Workflow updated");
                })),
        );

        workflows.insert(id.clone(), Arc::clone(&orchestrator));
        WORKFLOWS_CREATED_TOTAL.inc();
        info!(workflow = %id, "Workflow created");
        Some((id, orchestrator))
    }

    pub async fn workflow(&self, id: &str) -> Option<Arc<Orchestrator>> {
        self.workflows.read().await.get(id).cloned()
    }

    /// Discard a workflow session. In-flight requests finish against the dropped state.
    pub async fn remove_workflow(&self, id: &str) -> bool {
        let removed = self.workflows.write().await.remove(id).is_some();
        if removed {
            info!(workflow = %id, "Workflow discarded");
        }
        removed
    }

    /// All workflow sessions currently held.
    pub async fn workflows(&self) -> Vec<Arc<Orchestrator>> {
        self.workflows.read().await.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posecast_core::testing::MockGenerator;
    use posecast_core::OrchestratorConfig;

    fn state_with_limit(max_workflows: usize) -> AppState {
        let config = Config {
            orchestrator: OrchestratorConfig { max_workflows },
            ..Default::default()
        };
        AppState::new(config, Arc::new(MockGenerator::new()))
    }

    #[tokio::test]
    async fn test_create_and_remove_workflow() {
        let state = state_with_limit(0);
        let (id, _) = state.create_workflow().await.unwrap();

        assert!(state.workflow(&id).await.is_some());
        assert!(state.remove_workflow(&id).await);
        assert!(state.workflow(&id).await.is_none());
        assert!(!state.remove_workflow(&id).await);
    }

    #[tokio::test]
    async fn test_workflow_limit() {
        let state = state_with_limit(2);
        let (first, _) = state.create_workflow().await.unwrap();
        state.create_workflow().await.unwrap();
        assert!(state.create_workflow().await.is_none());

        state.remove_workflow(&first).await;
        assert!(state.create_workflow().await.is_some());
        assert_eq!(state.workflows().await.len(), 2);
    }

    #[tokio::test]
    async fn test_default_config_bounds_sessions() {
        let config = Config::default();
        let limit = config.orchestrator.max_workflows;
        assert!(limit > 0);

        let state = AppState::new(config, Arc::new(MockGenerator::new()));
        for _ in 0..limit {
            assert!(state.create_workflow().await.is_some());
        }
        assert!(state.create_workflow().await.is_none());
        assert_eq!(state.workflows().await.len(), limit);
    }

    #[test]
    fn test_sanitized_config_hides_api_key() {
        let mut config = Config::default();
        config.generator.api_key = Some("secret".to_string());
        let state = AppState::new(config, Arc::new(MockGenerator::new()));

        let sanitized = serde_json::to_string(&state.sanitized_config()).unwrap();
        assert!(!sanitized.contains("secret"));
        assert!(sanitized.contains("\"api_key_configured\":true"));
    }
}
