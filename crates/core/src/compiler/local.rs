//! Local LaTeX engine strategy.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tempfile::TempDir;
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

use super::config::LocalEngineConfig;
use super::error::CompilerError;
use super::traits::CompileStrategy;
use super::types::{validate_pdf, CompilationRequest, StrategyKind};

/// Source file written into the working directory.
pub const SOURCE_FILE_NAME: &str = "document.tex";

/// PDF the engine is expected to produce.
pub const PDF_FILE_NAME: &str = "document.pdf";

const LOG_FILE_NAME: &str = "document.log";

/// Cross references only resolve on the second run.
const LATEX_PASSES: u8 = 2;

const TEMP_DIR_PREFIX: &str = "latex-";

const LOG_TAIL_LINES: usize = 20;

/// Compiles with an engine installed on this host.
///
/// Every compile gets its own uniquely named working directory, which is
/// removed before `compile` returns (or when the future is dropped).
pub struct LocalLatexEngine {
    config: LocalEngineConfig,
    min_pdf_bytes: usize,
}

impl LocalLatexEngine {
    /// Relative engine and temp paths are anchored to the current directory
    /// here, since passes run with the working directory as `current_dir`.
    pub fn new(mut config: LocalEngineConfig, min_pdf_bytes: usize) -> Self {
        if config.engine.components().count() > 1 {
            config.engine = absolutize(config.engine);
        }
        config.temp_dir = config.temp_dir.map(absolutize);
        Self {
            config,
            min_pdf_bytes,
        }
    }

    /// Engine the version check and every pass spawn.
    pub fn engine_path(&self) -> &Path {
        &self.config.engine
    }

    /// Creates an engine using `pdflatex` from `PATH`.
    pub fn with_defaults() -> Self {
        Self::new(LocalEngineConfig::default(), 64)
    }

    fn temp_base(&self) -> PathBuf {
        self.config
            .temp_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }

    fn unavailable(&self, reason: impl Into<String>) -> CompilerError {
        CompilerError::EngineUnavailable {
            engine: self.config.engine.clone(),
            reason: reason.into(),
        }
    }

    /// Runs `<engine> --version` to check the engine can be executed.
    pub async fn check_version(&self) -> Result<(), CompilerError> {
        let mut child = Command::new(&self.config.engine)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.unavailable(e.to_string()))?;

        let result = timeout(
            Duration::from_secs(self.config.version_check_timeout_secs),
            child.wait(),
        )
        .await;

        match result {
            Ok(Ok(status)) if status.success() => Ok(()),
            Ok(Ok(status)) => Err(self.unavailable(format!(
                "version check exited with code {:?}",
                status.code()
            ))),
            Ok(Err(e)) => Err(self.unavailable(e.to_string())),
            Err(_) => {
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill timed out LaTeX version check: {}", e);
                }
                Err(self.unavailable(format!(
                    "version check timed out after {} seconds",
                    self.config.version_check_timeout_secs
                )))
            }
        }
    }

    /// Builds the argument vector for one compiler pass.
    fn build_pass_args(&self, workdir: &Path) -> Vec<OsString> {
        let mut output_dir = OsString::from("-output-directory=");
        output_dir.push(workdir);

        let mut args = vec![OsString::from("-interaction=nonstopmode"), output_dir];
        args.extend(self.config.extra_args.iter().map(OsString::from));
        args.push(OsString::from(SOURCE_FILE_NAME));
        args
    }

    async fn run_pass(&self, workdir: &Path, pass: u8) -> Result<(), CompilerError> {
        let mut child = Command::new(&self.config.engine)
            .args(self.build_pass_args(workdir))
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    self.unavailable(e.to_string())
                } else {
                    CompilerError::Io(e)
                }
            })?;

        let result = timeout(
            Duration::from_secs(self.config.pass_timeout_secs),
            child.wait(),
        )
        .await;

        match result {
            Ok(Ok(status)) if status.success() => Ok(()),
            Ok(Ok(status)) => Err(CompilerError::pass_failed(
                pass,
                format!("engine exited with code {:?}", status.code()),
                read_log_tail(workdir).await,
            )),
            Ok(Err(e)) => Err(CompilerError::Io(e)),
            Err(_) => {
                // Kill the engine on timeout
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill timed out LaTeX engine: {}", e);
                }
                Err(CompilerError::LocalTimeout {
                    pass,
                    timeout_secs: self.config.pass_timeout_secs,
                })
            }
        }
    }

    /// Writes the source, runs both passes and reads the PDF back.
    async fn compile_in(
        &self,
        workdir: &Path,
        request: &CompilationRequest,
    ) -> Result<Vec<u8>, CompilerError> {
        tokio::fs::write(workdir.join(SOURCE_FILE_NAME), &request.source).await?;

        for pass in 1..=LATEX_PASSES {
            self.run_pass(workdir, pass).await?;
            debug!(
                identifier = %request.identifier,
                pass,
                "LaTeX pass completed"
            );
        }

        let pdf_path = workdir.join(PDF_FILE_NAME);
        let bytes = match tokio::fs::read(&pdf_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CompilerError::OutputMissing { path: pdf_path });
            }
            Err(e) => return Err(CompilerError::Io(e)),
        };

        validate_pdf(&bytes, self.min_pdf_bytes)?;
        Ok(bytes)
    }
}

/// Joins a relative path onto the current directory.
///
/// Bare command names (a single component) are left for `PATH` lookup by
/// the caller.
fn absolutize(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        return path;
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(e) => {
            warn!("Cannot resolve {} against the current directory: {}", path.display(), e);
            path
        }
    }
}

/// Last lines of the engine log, if the engine wrote one.
async fn read_log_tail(workdir: &Path) -> Option<String> {
    let log = tokio::fs::read(workdir.join(LOG_FILE_NAME)).await.ok()?;
    let log = String::from_utf8_lossy(&log);
    let lines: Vec<&str> = log.lines().collect();
    let start = lines.len().saturating_sub(LOG_TAIL_LINES);
    let tail = lines[start..].join("\n");
    if tail.trim().is_empty() {
        None
    } else {
        Some(tail)
    }
}

/// Removes a working directory off the async runtime.
async fn remove_workdir(workdir: TempDir) {
    let path = workdir.path().to_path_buf();
    match tokio::task::spawn_blocking(move || workdir.close()).await {
        Ok(Ok(())) => debug!("Removed LaTeX working directory {}", path.display()),
        Ok(Err(e)) => warn!(
            "Failed to remove LaTeX working directory {}: {}",
            path.display(),
            e
        ),
        Err(e) => warn!(
            "Cleanup task for LaTeX working directory {} failed: {}",
            path.display(),
            e
        ),
    }
}

#[async_trait]
impl CompileStrategy for LocalLatexEngine {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Local
    }

    fn describe(&self) -> String {
        self.config.engine.display().to_string()
    }

    async fn compile(&self, request: &CompilationRequest) -> Result<Vec<u8>, CompilerError> {
        self.check_version().await?;

        let base = self.temp_base();
        if self.config.temp_dir.is_some() {
            tokio::fs::create_dir_all(&base).await?;
        }
        let workdir = tempfile::Builder::new()
            .prefix(TEMP_DIR_PREFIX)
            .tempdir_in(&base)?;
        debug!(
            identifier = %request.identifier,
            workdir = %workdir.path().display(),
            "Created LaTeX working directory"
        );

        let result = self.compile_in(workdir.path(), request).await;
        remove_workdir(workdir).await;
        result
    }

    async fn validate(&self) -> Result<(), CompilerError> {
        self.check_version().await
    }
}
