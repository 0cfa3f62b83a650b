use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use crate::compiler::{LocalEngineConfig, RemoteEngineConfig};

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub compiler: CompilerConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    4000
}

/// Database configuration (compiled artifact markers)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("quali.db")
}

/// Compilation configuration.
///
/// The local engine is tried first and the remote service is the fallback.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompilerConfig {
    /// Minimum size of an accepted PDF buffer, in bytes.
    #[serde(default = "default_min_pdf_bytes")]
    pub min_pdf_bytes: usize,
    #[serde(default)]
    pub local: LocalEngineConfig,
    #[serde(default)]
    pub remote: RemoteEngineConfig,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            min_pdf_bytes: default_min_pdf_bytes(),
            local: LocalEngineConfig::default(),
            remote: RemoteEngineConfig::default(),
        }
    }
}

fn default_min_pdf_bytes() -> usize {
    64
}
