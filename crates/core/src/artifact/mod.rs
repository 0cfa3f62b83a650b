//! Records which identifiers have a compiled PDF.
//!
//! Compilation never waits on storage: the orchestrator sends markers
//! through an [`ArtifactHandle`] and an [`ArtifactWriter`] task persists
//! them to an [`ArtifactStore`].

mod handle;
mod sqlite;
mod store;
mod types;
mod writer;

pub use handle::*;
pub use sqlite::*;
pub use store::*;
pub use types::*;
pub use writer::*;
