pub mod artifact;
pub mod compiler;
pub mod config;
pub mod metrics;
pub mod testing;

pub use artifact::{
    artifact_reference, create_artifact_recorder, ArtifactError, ArtifactHandle, ArtifactStore,
    ArtifactWriter, CompiledArtifact, SqliteArtifactStore,
};
pub use compiler::{
    CompilationAttempt, CompilationError, CompilationOrchestrator, CompilationRequest,
    CompileStrategy, CompiledPdf, CompilerError, LocalEngineConfig, LocalLatexEngine,
    RemoteEngineConfig, RemoteLatexService, StrategyKind, StrategyStatus,
    COMPILATION_FAILED_MESSAGE,
};
pub use config::{
    load_config, load_config_from_str, validate_config, CompilerConfig, Config, ConfigError,
};
