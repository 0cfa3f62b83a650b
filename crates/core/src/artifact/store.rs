use thiserror::Error;

use super::CompiledArtifact;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Database error: {0}")]
    Database(String),
}

/// Storage for compiled artifact markers.
pub trait ArtifactStore: Send + Sync {
    /// Insert or replace the marker for `artifact.identifier`.
    fn record(&self, artifact: &CompiledArtifact) -> Result<(), ArtifactError>;

    /// Marker for an identifier, if it was ever compiled.
    fn get(&self, identifier: &str) -> Result<Option<CompiledArtifact>, ArtifactError>;

    /// Markers ordered newest first.
    fn list(&self, limit: i64, offset: i64) -> Result<Vec<CompiledArtifact>, ArtifactError>;

    /// Number of recorded identifiers.
    fn count(&self) -> Result<i64, ArtifactError>;
}
