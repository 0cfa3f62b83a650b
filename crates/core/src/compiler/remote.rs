//! Remote compilation service strategy.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

use super::config::RemoteEngineConfig;
use super::error::CompilerError;
use super::traits::CompileStrategy;
use super::types::{validate_pdf, CompilationRequest, StrategyKind};

/// Upper bound for pre-allocating the response buffer.
const MAX_PREALLOCATED_BYTES: u64 = 16 * 1024 * 1024;

/// Characters of an error body kept for diagnostics.
const ERROR_BODY_PREVIEW_CHARS: usize = 200;

/// Compiles by posting the source to an HTTP compilation service.
///
/// The request is form encoded with two fields: `text` (the source) and
/// `command` (the engine the service should run).
pub struct RemoteLatexService {
    client: Client,
    config: RemoteEngineConfig,
    min_pdf_bytes: usize,
}

impl RemoteLatexService {
    pub fn new(config: RemoteEngineConfig, min_pdf_bytes: usize) -> Result<Self, CompilerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("quali/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CompilerError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            config,
            min_pdf_bytes,
        })
    }

    /// The configured compile endpoint.
    pub fn endpoint(&self) -> &str {
        &self.config.url
    }

    fn map_request_error(&self, e: reqwest::Error) -> CompilerError {
        if e.is_timeout() {
            CompilerError::remote_failed(
                None,
                format!("request timed out after {} seconds", self.config.timeout_secs),
            )
        } else if e.is_connect() {
            CompilerError::remote_failed(None, format!("connection failed: {}", e))
        } else {
            CompilerError::remote_failed(e.status().map(|s| s.as_u16()), e.to_string())
        }
    }

    fn oversized_response(&self, max_bytes: u64) -> CompilerError {
        CompilerError::remote_failed(
            Some(StatusCode::OK.as_u16()),
            format!("response exceeded {} bytes", max_bytes),
        )
    }
}

#[async_trait]
impl CompileStrategy for RemoteLatexService {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Remote
    }

    fn describe(&self) -> String {
        self.config.url.clone()
    }

    async fn compile(&self, request: &CompilationRequest) -> Result<Vec<u8>, CompilerError> {
        let params = [
            ("text", request.source.as_str()),
            ("command", self.config.command.as_str()),
        ];

        let mut response = self
            .client
            .post(&self.config.url)
            .form(&params)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            let preview: String = body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect();
            return Err(CompilerError::remote_failed(
                Some(status.as_u16()),
                format!("service responded with status {}: {}", status, preview.trim()),
            ));
        }

        let max_bytes = self.config.max_response_bytes;
        let declared = response.content_length().unwrap_or(0);
        if declared > max_bytes {
            return Err(self.oversized_response(max_bytes));
        }

        let capacity = declared.min(MAX_PREALLOCATED_BYTES) as usize;
        let mut buffer = Vec::with_capacity(capacity);
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| self.map_request_error(e))?
        {
            if (buffer.len() + chunk.len()) as u64 > max_bytes {
                return Err(self.oversized_response(max_bytes));
            }
            buffer.extend_from_slice(&chunk);
        }

        debug!(
            identifier = %request.identifier,
            bytes = buffer.len(),
            "Received remote compilation response"
        );

        validate_pdf(&buffer, self.min_pdf_bytes)?;
        Ok(buffer)
    }
}
