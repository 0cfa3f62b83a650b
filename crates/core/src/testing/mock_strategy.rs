//! Mock compile strategy for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use super::fixtures;
use crate::compiler::{CompilationRequest, CompileStrategy, CompilerError, StrategyKind};

#[derive(Debug)]
struct MockState {
    /// Bytes returned on success.
    output: Vec<u8>,
    /// If set, every compile fails with this reason.
    failure: Option<String>,
    /// Simulated compile duration.
    delay: Duration,
    /// Result of `validate`.
    available: bool,
    /// Requests received, in order.
    requests: Vec<CompilationRequest>,
}

/// Mock implementation of [`CompileStrategy`].
///
/// Clones share state, so a test can keep one copy for assertions while the
/// orchestrator owns another.
///
/// # Example
///
/// ```rust,ignore
/// use quali_core::testing::MockStrategy;
///
/// let local = MockStrategy::local();
/// local.fail_with("pdflatex not installed").await;
///
/// let remote = MockStrategy::remote();
/// // ... build an orchestrator over both, then:
/// assert_eq!(remote.call_count().await, 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockStrategy {
    kind: StrategyKind,
    state: Arc<RwLock<MockState>>,
}

impl MockStrategy {
    /// Create a mock of the given kind that returns a small valid PDF.
    pub fn new(kind: StrategyKind) -> Self {
        Self {
            kind,
            state: Arc::new(RwLock::new(MockState {
                output: fixtures::fake_pdf(),
                failure: None,
                delay: Duration::ZERO,
                available: true,
                requests: Vec::new(),
            })),
        }
    }

    pub fn local() -> Self {
        Self::new(StrategyKind::Local)
    }

    pub fn remote() -> Self {
        Self::new(StrategyKind::Remote)
    }

    /// Succeed with the given bytes (clears any configured failure).
    pub async fn succeed_with(&self, bytes: Vec<u8>) {
        let mut state = self.state.write().await;
        state.output = bytes;
        state.failure = None;
    }

    /// Fail every compile with the given reason.
    pub async fn fail_with(&self, reason: impl Into<String>) {
        self.state.write().await.failure = Some(reason.into());
    }

    /// Sleep this long before answering.
    pub async fn set_delay(&self, delay: Duration) {
        self.state.write().await.delay = delay;
    }

    /// Control the result of `validate`.
    pub async fn set_available(&self, available: bool) {
        self.state.write().await.available = available;
    }

    /// Number of compile calls received.
    pub async fn call_count(&self) -> usize {
        self.state.read().await.requests.len()
    }

    /// All requests received.
    pub async fn recorded_requests(&self) -> Vec<CompilationRequest> {
        self.state.read().await.requests.clone()
    }

    fn failure(&self, reason: String) -> CompilerError {
        match self.kind {
            StrategyKind::Local => CompilerError::pass_failed(1, reason, None),
            StrategyKind::Remote => CompilerError::remote_failed(None, reason),
        }
    }
}

#[async_trait]
impl CompileStrategy for MockStrategy {
    fn kind(&self) -> StrategyKind {
        self.kind
    }

    fn describe(&self) -> String {
        format!("mock-{}", self.kind)
    }

    async fn compile(&self, request: &CompilationRequest) -> Result<Vec<u8>, CompilerError> {
        let (delay, failure, output) = {
            let mut state = self.state.write().await;
            state.requests.push(request.clone());
            (state.delay, state.failure.clone(), state.output.clone())
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match failure {
            Some(reason) => Err(self.failure(reason)),
            None => Ok(output),
        }
    }

    async fn validate(&self) -> Result<(), CompilerError> {
        if self.state.read().await.available {
            Ok(())
        } else {
            Err(self.failure("mock strategy unavailable".to_string()))
        }
    }
}
