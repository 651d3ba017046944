use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Scratch directory is set
/// - Tool paths are set and timeouts are non-zero
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.scratch.dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "scratch.dir cannot be empty".to_string(),
        ));
    }

    if config.provider.ytdlp_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "provider.ytdlp_path cannot be empty".to_string(),
        ));
    }

    if config.converter.ffmpeg_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "converter.ffmpeg_path cannot be empty".to_string(),
        ));
    }

    if config.provider.search_timeout_secs == 0
        || config.provider.process_timeout_secs == 0
        || config.converter.timeout_secs == 0
    {
        return Err(ConfigError::ValidationError(
            "timeouts must be greater than 0".to_string(),
        ));
    }

    Ok(())
}
