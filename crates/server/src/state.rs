use quali_core::{ArtifactStore, CompilationOrchestrator, Config};
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    config: Config,
    orchestrator: Arc<CompilationOrchestrator>,
    artifact_store: Arc<dyn ArtifactStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        orchestrator: Arc<CompilationOrchestrator>,
        artifact_store: Arc<dyn ArtifactStore>,
    ) -> Self {
        Self {
            config,
            orchestrator,
            artifact_store,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn orchestrator(&self) -> &CompilationOrchestrator {
        self.orchestrator.as_ref()
    }

    pub fn artifact_store(&self) -> &dyn ArtifactStore {
        self.artifact_store.as_ref()
    }
}
