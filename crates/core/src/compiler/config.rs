//! Configuration for the compilation strategies.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Compiler commands accepted by the remote compilation service.
pub const SUPPORTED_REMOTE_COMMANDS: &[&str] = &["pdflatex", "xelatex", "lualatex"];

/// Configuration for the locally installed LaTeX engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalEngineConfig {
    /// Whether the local strategy is attempted at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Path or name of the engine binary.
    #[serde(default = "default_engine")]
    pub engine: PathBuf,

    /// Timeout for a single compiler pass in seconds.
    #[serde(default = "default_pass_timeout")]
    pub pass_timeout_secs: u64,

    /// Timeout for the `--version` availability check in seconds.
    #[serde(default = "default_version_check_timeout")]
    pub version_check_timeout_secs: u64,

    /// Base directory for per-compile working directories.
    /// Defaults to the system temp directory.
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,

    /// Additional engine arguments, placed before the source file.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

fn default_engine() -> PathBuf {
    PathBuf::from("pdflatex")
}

fn default_pass_timeout() -> u64 {
    30
}

fn default_version_check_timeout() -> u64 {
    10
}

impl Default for LocalEngineConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            engine: default_engine(),
            pass_timeout_secs: default_pass_timeout(),
            version_check_timeout_secs: default_version_check_timeout(),
            temp_dir: None,
            extra_args: Vec::new(),
        }
    }
}

impl LocalEngineConfig {
    /// Creates a config for a specific engine binary.
    pub fn with_engine(engine: impl Into<PathBuf>) -> Self {
        Self {
            engine: engine.into(),
            ..Default::default()
        }
    }

    /// Sets the per-pass timeout in seconds.
    pub fn with_pass_timeout(mut self, timeout_secs: u64) -> Self {
        self.pass_timeout_secs = timeout_secs;
        self
    }

    /// Sets the base directory for working directories.
    pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(temp_dir.into());
        self
    }
}

/// Configuration for the remote compilation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteEngineConfig {
    /// Whether the remote fallback is attempted.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Compile endpoint URL.
    #[serde(default = "default_remote_url")]
    pub url: String,

    /// Compiler command requested from the service.
    #[serde(default = "default_remote_command")]
    pub command: String,

    /// Total request timeout in seconds (connect, upload and body).
    #[serde(default = "default_remote_timeout")]
    pub timeout_secs: u64,

    /// Largest response body accepted, in bytes.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: u64,
}

fn default_remote_url() -> String {
    "https://latexonline.cc/compile".to_string()
}

fn default_remote_command() -> String {
    "pdflatex".to_string()
}

fn default_remote_timeout() -> u64 {
    60
}

fn default_max_response_bytes() -> u64 {
    50 * 1024 * 1024
}

impl Default for RemoteEngineConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            url: default_remote_url(),
            command: default_remote_command(),
            timeout_secs: default_remote_timeout(),
            max_response_bytes: default_max_response_bytes(),
        }
    }
}

impl RemoteEngineConfig {
    /// Creates a config pointing at a specific endpoint.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Sets the request timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Sets the largest accepted response body in bytes.
    pub fn with_max_response_bytes(mut self, max_response_bytes: u64) -> Self {
        self.max_response_bytes = max_response_bytes;
        self
    }
}
