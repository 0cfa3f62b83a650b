//! Error types for the compiler module.

use std::path::PathBuf;
use thiserror::Error;

use super::types::CompilationAttempt;

/// Message shown to callers when every strategy failed.
pub const COMPILATION_FAILED_MESSAGE: &str =
    "LaTeX compilation failed. Please check your syntax or install LaTeX on the server.";

/// Errors produced by a single compilation strategy.
///
/// These never reach the caller directly; the orchestrator records them as
/// attempts and moves on to the next strategy.
#[derive(Debug, Error)]
pub enum CompilerError {
    /// The local engine could not be found or its version check failed.
    #[error("LaTeX engine unavailable ({engine}): {reason}")]
    EngineUnavailable { engine: PathBuf, reason: String },

    /// A compiler pass exited with an error.
    #[error("LaTeX pass {pass} failed: {reason}")]
    LocalCompilationFailed {
        pass: u8,
        reason: String,
        log_tail: Option<String>,
    },

    /// A compiler pass exceeded its wall-clock budget and was killed.
    #[error("LaTeX pass {pass} timed out after {timeout_secs} seconds")]
    LocalTimeout { pass: u8, timeout_secs: u64 },

    /// The engine exited successfully but the PDF is not there.
    #[error("Expected PDF output not found: {path}")]
    OutputMissing { path: PathBuf },

    /// Output was produced but is not an acceptable PDF.
    #[error("Invalid PDF output: {reason}")]
    InvalidOutput { reason: String },

    /// The remote service failed, timed out or answered with a non-200 status.
    #[error("Remote compilation failed: {reason}")]
    RemoteCompilationFailed { status: Option<u16>, reason: String },

    /// The strategy could not be constructed from its configuration.
    #[error("Compiler configuration error: {0}")]
    Configuration(String),

    /// I/O error in the working directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompilerError {
    /// Creates a failed pass error with the tail of the engine log.
    pub fn pass_failed(pass: u8, reason: impl Into<String>, log_tail: Option<String>) -> Self {
        Self::LocalCompilationFailed {
            pass,
            reason: reason.into(),
            log_tail,
        }
    }

    /// Creates a remote failure error.
    pub fn remote_failed(status: Option<u16>, reason: impl Into<String>) -> Self {
        Self::RemoteCompilationFailed {
            status,
            reason: reason.into(),
        }
    }

    /// Creates an invalid output error.
    pub fn invalid_output(reason: impl Into<String>) -> Self {
        Self::InvalidOutput {
            reason: reason.into(),
        }
    }

    /// Short label used for metrics.
    pub fn reason_label(&self) -> &'static str {
        match self {
            Self::EngineUnavailable { .. } => "engine_unavailable",
            Self::LocalCompilationFailed { .. } => "exit_failure",
            Self::LocalTimeout { .. } => "timeout",
            Self::OutputMissing { .. } => "output_missing",
            Self::InvalidOutput { .. } => "invalid_output",
            Self::RemoteCompilationFailed { .. } => "remote_failure",
            Self::Configuration(_) => "configuration",
            Self::Io(_) => "io",
        }
    }
}

/// Every configured strategy failed for one request.
///
/// `Display` is the generic user-facing message; the underlying causes are
/// kept in `attempts` for logging.
#[derive(Debug, Error)]
#[error("{}", COMPILATION_FAILED_MESSAGE)]
pub struct CompilationError {
    pub identifier: String,
    pub attempts: Vec<CompilationAttempt>,
}

impl CompilationError {
    /// One-line summary of every attempt, e.g. `local: ...; remote: ...`.
    pub fn causes(&self) -> String {
        if self.attempts.is_empty() {
            return "no compilation strategy configured".to_string();
        }
        self.attempts
            .iter()
            .map(|a| {
                format!(
                    "{}: {}",
                    a.strategy,
                    a.error.as_deref().unwrap_or("unknown error")
                )
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}
