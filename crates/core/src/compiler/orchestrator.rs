//! Fallback orchestration over the configured strategies.

use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::artifact::{ArtifactHandle, CompiledArtifact};
use crate::config::CompilerConfig;
use crate::metrics::{COMPILATIONS_TOTAL, STRATEGY_ATTEMPTS, STRATEGY_DURATION};

use super::error::{CompilationError, CompilerError};
use super::local::LocalLatexEngine;
use super::remote::RemoteLatexService;
use super::traits::CompileStrategy;
use super::types::{
    validate_pdf, CompilationAttempt, CompilationRequest, CompiledPdf, StrategyKind,
    PDF_SIGNATURE,
};

/// Availability of one configured strategy.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyStatus {
    pub strategy: StrategyKind,
    pub target: String,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Tries each strategy in order until one returns a PDF.
///
/// A failure of any strategy but the last is logged and recovered; only
/// when every strategy failed does the caller see a [`CompilationError`].
pub struct CompilationOrchestrator {
    strategies: Vec<Arc<dyn CompileStrategy>>,
    artifacts: Option<ArtifactHandle>,
}

impl CompilationOrchestrator {
    /// Creates an orchestrator over an ordered list of strategies.
    pub fn new(strategies: Vec<Arc<dyn CompileStrategy>>) -> Self {
        Self {
            strategies,
            artifacts: None,
        }
    }

    /// Builds the `[local, remote]` chain from configuration.
    pub fn from_config(config: &CompilerConfig) -> Result<Self, CompilerError> {
        let mut strategies: Vec<Arc<dyn CompileStrategy>> = Vec::new();

        if config.local.enabled {
            strategies.push(Arc::new(LocalLatexEngine::new(
                config.local.clone(),
                config.min_pdf_bytes,
            )));
        }
        if config.remote.enabled {
            strategies.push(Arc::new(RemoteLatexService::new(
                config.remote.clone(),
                config.min_pdf_bytes,
            )?));
        }

        Ok(Self::new(strategies))
    }

    /// Records compiled artifact markers through the given handle.
    pub fn with_artifacts(mut self, handle: ArtifactHandle) -> Self {
        self.artifacts = Some(handle);
        self
    }

    /// Kinds of the configured strategies, in attempt order.
    pub fn strategy_kinds(&self) -> Vec<StrategyKind> {
        self.strategies.iter().map(|s| s.kind()).collect()
    }

    /// Compiles the request with the first strategy that succeeds.
    pub async fn compile(
        &self,
        request: CompilationRequest,
    ) -> Result<CompiledPdf, CompilationError> {
        let start = Instant::now();
        let mut attempts = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            let kind = strategy.kind();
            let attempt_start = Instant::now();

            // Strategies validate against their own size threshold; the
            // signature check here keeps a misbehaving strategy from ever
            // handing back an empty buffer.
            let outcome = strategy.compile(&request).await.and_then(|bytes| {
                validate_pdf(&bytes, PDF_SIGNATURE.len())?;
                Ok(bytes)
            });

            let elapsed = attempt_start.elapsed();
            STRATEGY_DURATION
                .with_label_values(&[kind.as_str()])
                .observe(elapsed.as_secs_f64());
            let elapsed_ms = elapsed.as_millis() as u64;

            match outcome {
                Ok(bytes) => {
                    STRATEGY_ATTEMPTS
                        .with_label_values(&[kind.as_str(), "success"])
                        .inc();
                    COMPILATIONS_TOTAL.with_label_values(&["success"]).inc();
                    attempts.push(CompilationAttempt::succeeded(kind, elapsed_ms));

                    info!(
                        identifier = %request.identifier,
                        strategy = %kind,
                        bytes = bytes.len(),
                        duration_ms = elapsed_ms,
                        "LaTeX compiled successfully"
                    );

                    self.record_artifact(&request.identifier, kind, bytes.len());

                    return Ok(CompiledPdf {
                        bytes,
                        strategy: kind,
                        attempts,
                        duration_ms: start.elapsed().as_millis() as u64,
                    });
                }
                Err(e) => {
                    STRATEGY_ATTEMPTS
                        .with_label_values(&[kind.as_str(), e.reason_label()])
                        .inc();
                    warn!(
                        identifier = %request.identifier,
                        strategy = %kind,
                        target = %strategy.describe(),
                        error = %e,
                        "Compilation strategy failed"
                    );
                    if let CompilerError::LocalCompilationFailed {
                        log_tail: Some(ref log),
                        ..
                    } = e
                    {
                        debug!(identifier = %request.identifier, "Engine log tail:\n{}", log);
                    }
                    attempts.push(CompilationAttempt::failed(kind, e.to_string(), elapsed_ms));
                }
            }
        }

        COMPILATIONS_TOTAL.with_label_values(&["failed"]).inc();
        let err = CompilationError {
            identifier: request.identifier,
            attempts,
        };
        error!(
            identifier = %err.identifier,
            causes = %err.causes(),
            "All compilation strategies failed"
        );
        Err(err)
    }

    /// Checks every configured strategy.
    pub async fn status(&self) -> Vec<StrategyStatus> {
        let mut statuses = Vec::with_capacity(self.strategies.len());
        for strategy in &self.strategies {
            let result = strategy.validate().await;
            statuses.push(StrategyStatus {
                strategy: strategy.kind(),
                target: strategy.describe(),
                available: result.is_ok(),
                detail: result.err().map(|e| e.to_string()),
            });
        }
        statuses
    }

    /// Fire-and-forget; a full or closed channel is only logged.
    fn record_artifact(&self, identifier: &str, strategy: StrategyKind, size_bytes: usize) {
        if let Some(ref handle) = self.artifacts {
            handle.try_record(CompiledArtifact::new(identifier, strategy, size_bytes as u64));
        }
    }
}
