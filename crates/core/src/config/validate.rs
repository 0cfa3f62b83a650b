use super::{types::Config, ConfigError};
use crate::compiler::SUPPORTED_REMOTE_COMMANDS;

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - At least one compilation strategy is enabled
/// - Enabled strategies have usable engines, endpoints and timeouts
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    let compiler = &config.compiler;
    if !compiler.local.enabled && !compiler.remote.enabled {
        return Err(ConfigError::ValidationError(
            "at least one of compiler.local or compiler.remote must be enabled".to_string(),
        ));
    }

    if compiler.local.enabled {
        if compiler.local.engine.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "compiler.local.engine cannot be empty".to_string(),
            ));
        }
        if compiler.local.pass_timeout_secs == 0
            || compiler.local.version_check_timeout_secs == 0
        {
            return Err(ConfigError::ValidationError(
                "compiler.local timeouts must be greater than 0".to_string(),
            ));
        }
    }

    if compiler.remote.enabled {
        let url = reqwest::Url::parse(&compiler.remote.url).map_err(|e| {
            ConfigError::ValidationError(format!(
                "compiler.remote.url is invalid ({}): {}",
                compiler.remote.url, e
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError(format!(
                "compiler.remote.url must use http or https, got {}",
                url.scheme()
            )));
        }
        if !SUPPORTED_REMOTE_COMMANDS.contains(&compiler.remote.command.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "compiler.remote.command must be one of {:?}, got {}",
                SUPPORTED_REMOTE_COMMANDS, compiler.remote.command
            )));
        }
        if compiler.remote.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "compiler.remote.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if compiler.remote.max_response_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "compiler.remote.max_response_bytes must be greater than 0".to_string(),
            ));
        }
    }

    Ok(())
}
