use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::compiler::StrategyKind;

/// Reference stored for a compiled identifier.
pub fn artifact_reference(identifier: &str) -> String {
    format!("compiled-{}.pdf", identifier)
}

/// Marker that an identifier was compiled successfully.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledArtifact {
    pub identifier: String,
    /// `compiled-{identifier}.pdf`
    pub reference: String,
    pub strategy: StrategyKind,
    pub size_bytes: u64,
    pub compiled_at: DateTime<Utc>,
}

impl CompiledArtifact {
    pub fn new(identifier: impl Into<String>, strategy: StrategyKind, size_bytes: u64) -> Self {
        let identifier = identifier.into();
        Self {
            reference: artifact_reference(&identifier),
            identifier,
            strategy,
            size_bytes,
            compiled_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_format() {
        assert_eq!(artifact_reference("42"), "compiled-42.pdf");
        assert_eq!(artifact_reference("intro-post"), "compiled-intro-post.pdf");
    }

    #[test]
    fn test_new_fills_reference_and_timestamp() {
        let before = Utc::now();
        let artifact = CompiledArtifact::new("7", StrategyKind::Remote, 2048);
        assert_eq!(artifact.reference, "compiled-7.pdf");
        assert_eq!(artifact.strategy, StrategyKind::Remote);
        assert_eq!(artifact.size_bytes, 2048);
        assert!(artifact.compiled_at >= before);
    }

    #[test]
    fn test_serializes_strategy_lowercase() {
        let artifact = CompiledArtifact::new("7", StrategyKind::Local, 10);
        let json = serde_json::to_value(&artifact).unwrap();
        assert_eq!(json["strategy"], "local");
        assert_eq!(json["reference"], "compiled-7.pdf");
    }
}
