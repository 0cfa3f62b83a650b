use tokio::sync::mpsc;

use super::CompiledArtifact;

/// Handle for recording compiled artifacts
///
/// Cheaply cloneable. Markers are sent through a channel and persisted by
/// the [`ArtifactWriter`](super::ArtifactWriter); callers are never failed
/// by storage problems.
#[derive(Clone)]
pub struct ArtifactHandle {
    tx: mpsc::Sender<CompiledArtifact>,
}

impl ArtifactHandle {
    pub fn new(tx: mpsc::Sender<CompiledArtifact>) -> Self {
        Self { tx }
    }

    /// Record a marker, waiting for channel capacity
    pub async fn record(&self, artifact: CompiledArtifact) {
        if let Err(e) = self.tx.send(artifact).await {
            tracing::error!("Failed to record compiled artifact: {}", e);
        }
    }

    /// Record a marker without waiting
    ///
    /// Returns false when the channel is full or closed.
    pub fn try_record(&self, artifact: CompiledArtifact) -> bool {
        let identifier = artifact.identifier.clone();
        match self.tx.try_send(artifact) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    identifier = %identifier,
                    "Failed to record compiled artifact: {}",
                    e
                );
                false
            }
        }
    }
}
