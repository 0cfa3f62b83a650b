//! LaTeX to PDF compilation.
//!
//! A [`CompilationOrchestrator`] runs an ordered chain of
//! [`CompileStrategy`] implementations. The default chain is the
//! [`LocalLatexEngine`] (an installed `pdflatex`, run twice in a scratch
//! directory) followed by the [`RemoteLatexService`] (a form POST to an
//! online compiler). The first strategy that yields a valid PDF wins.

mod config;
mod error;
mod local;
mod orchestrator;
mod remote;
mod traits;
mod types;

pub use config::*;
pub use error::*;
pub use local::*;
pub use orchestrator::*;
pub use remote::*;
pub use traits::*;
pub use types::*;
