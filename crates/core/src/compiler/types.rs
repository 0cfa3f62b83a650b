//! Types for the compiler module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::CompilerError;

/// Leading bytes of every PDF file.
pub const PDF_SIGNATURE: &[u8] = b"%PDF-";

/// Which strategy produced (or failed to produce) a PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Installed LaTeX engine on this host.
    Local,
    /// External HTTP compilation service.
    Remote,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Self::Local),
            "remote" => Ok(Self::Remote),
            other => Err(format!("unknown strategy: {}", other)),
        }
    }
}

/// A single compile call.
#[derive(Debug, Clone)]
pub struct CompilationRequest {
    /// Opaque identifier used for logging and the artifact reference.
    pub identifier: String,
    /// LaTeX source text.
    pub source: String,
}

impl CompilationRequest {
    pub fn new(identifier: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            source: source.into(),
        }
    }
}

/// Outcome of one strategy for one request.
#[derive(Debug, Clone, Serialize)]
pub struct CompilationAttempt {
    pub strategy: StrategyKind,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl CompilationAttempt {
    pub fn succeeded(strategy: StrategyKind, duration_ms: u64) -> Self {
        Self {
            strategy,
            succeeded: true,
            error: None,
            duration_ms,
        }
    }

    pub fn failed(strategy: StrategyKind, error: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            strategy,
            succeeded: false,
            error: Some(error.into()),
            duration_ms,
        }
    }
}

/// A successfully compiled PDF.
#[derive(Debug, Clone)]
pub struct CompiledPdf {
    /// The PDF file contents.
    pub bytes: Vec<u8>,
    /// Strategy that produced the bytes.
    pub strategy: StrategyKind,
    /// Every attempt made, in order, including the successful one.
    pub attempts: Vec<CompilationAttempt>,
    /// Total wall-clock time of the compile call.
    pub duration_ms: u64,
}

/// Checks that a buffer looks like a complete PDF.
///
/// A buffer is accepted when it starts with `%PDF-` and is at least
/// `min_bytes` long.
pub fn validate_pdf(bytes: &[u8], min_bytes: usize) -> Result<(), CompilerError> {
    if bytes.is_empty() {
        return Err(CompilerError::invalid_output("output is empty"));
    }
    if !bytes.starts_with(PDF_SIGNATURE) {
        let head: Vec<u8> = bytes.iter().take(8).copied().collect();
        return Err(CompilerError::invalid_output(format!(
            "missing PDF signature (first bytes: {:?})",
            String::from_utf8_lossy(&head)
        )));
    }
    if bytes.len() < min_bytes {
        return Err(CompilerError::invalid_output(format!(
            "output is {} bytes, expected at least {}",
            bytes.len(),
            min_bytes
        )));
    }
    Ok(())
}
