//! Trait definitions for the compiler module.

use async_trait::async_trait;

use super::error::CompilerError;
use super::types::{CompilationRequest, StrategyKind};

/// One way of turning LaTeX source into PDF bytes.
#[async_trait]
pub trait CompileStrategy: Send + Sync {
    /// Which strategy this is.
    fn kind(&self) -> StrategyKind;

    /// Human readable target (engine path or endpoint URL).
    fn describe(&self) -> String;

    /// Compiles the request, returning a validated PDF buffer.
    async fn compile(&self, request: &CompilationRequest) -> Result<Vec<u8>, CompilerError>;

    /// Checks that the strategy is usable right now.
    async fn validate(&self) -> Result<(), CompilerError> {
        Ok(())
    }
}
