//! Testing utilities and mock implementations.
//!
//! Lets the orchestrator and the HTTP layer be exercised without a LaTeX
//! installation or network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use quali_core::testing::{fixtures, MockStrategy};
//!
//! let local = MockStrategy::local();
//! let remote = MockStrategy::remote();
//! remote.succeed_with(fixtures::fake_pdf()).await;
//! ```

mod mock_strategy;

pub use mock_strategy::MockStrategy;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::compiler::CompilationRequest;

    /// A complete, compilable LaTeX document.
    pub fn minimal_document() -> String {
        concat!(
            "\\documentclass{article}\n",
            "\\begin{document}\n",
            "Hello, world.\n",
            "\\end{document}\n",
        )
        .to_string()
    }

    /// Bytes that pass PDF validation at the default threshold.
    pub fn fake_pdf() -> Vec<u8> {
        let mut bytes = b"%PDF-1.5\n%\xE2\xE3\xCF\xD3\n".to_vec();
        bytes.extend(std::iter::repeat(b'0').take(128));
        bytes.extend_from_slice(b"\n%%EOF\n");
        bytes
    }

    /// A request for [`minimal_document`] with the given identifier.
    pub fn request(identifier: &str) -> CompilationRequest {
        CompilationRequest::new(identifier, minimal_document())
    }
}
