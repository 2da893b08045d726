use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Upload limit is positive
/// - Generator base URL is http(s) and the timeout is positive
/// - Placeholder image dimensions are positive
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.server.max_upload_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "server.max_upload_bytes cannot be 0".to_string(),
        ));
    }

    let base_url = &config.generator.base_url;
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "generator.base_url must be an http(s) URL, got {:?}",
            base_url
        )));
    }

    if config.generator.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "generator.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.placeholders.image_width == 0 || config.placeholders.image_height == 0 {
        return Err(ConfigError::ValidationError(
            "placeholders.image_width and image_height must be positive".to_string(),
        ));
    }

    Ok(())
}
