use std::sync::Arc;

use tokio::sync::mpsc;

use super::{ArtifactHandle, ArtifactStore, CompiledArtifact};
use crate::metrics::ARTIFACTS_RECORDED;

/// Background task that persists compiled artifact markers
pub struct ArtifactWriter {
    rx: mpsc::Receiver<CompiledArtifact>,
    store: Arc<dyn ArtifactStore>,
}

impl ArtifactWriter {
    pub fn new(rx: mpsc::Receiver<CompiledArtifact>, store: Arc<dyn ArtifactStore>) -> Self {
        Self { rx, store }
    }

    /// Consume markers until every handle is dropped
    pub async fn run(mut self) {
        tracing::info!("Artifact writer started");

        while let Some(artifact) = self.rx.recv().await {
            match self.store.record(&artifact) {
                Ok(()) => {
                    ARTIFACTS_RECORDED.with_label_values(&["success"]).inc();
                    tracing::debug!(
                        identifier = %artifact.identifier,
                        reference = %artifact.reference,
                        "Recorded compiled artifact"
                    );
                }
                Err(e) => {
                    ARTIFACTS_RECORDED.with_label_values(&["failed"]).inc();
                    tracing::error!(
                        identifier = %artifact.identifier,
                        "Failed to store compiled artifact: {}",
                        e
                    );
                }
            }
        }

        tracing::info!("Artifact writer shutting down");
    }
}

/// Create the recording pair
///
/// Spawn the writer with `tokio::spawn(writer.run())` and hand clones of
/// the handle to whoever compiles.
pub fn create_artifact_recorder(
    store: Arc<dyn ArtifactStore>,
    buffer_size: usize,
) -> (ArtifactHandle, ArtifactWriter) {
    let (tx, rx) = mpsc::channel(buffer_size);
    (ArtifactHandle::new(tx), ArtifactWriter::new(rx, store))
}
