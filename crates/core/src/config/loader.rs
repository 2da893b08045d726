use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::{Path, PathBuf};

use super::{types::Config, ConfigError};

/// Environment variable naming the config file.
pub const CONFIG_PATH_VAR: &str = "POSECAST_CONFIG";

const ENV_PREFIX: &str = "POSECAST_";
const DEFAULT_CONFIG_PATH: &str = "config.toml";

// Process-level variables sharing the prefix, not config keys.
const NON_CONFIG_VARS: &[&str] = &["CONFIG", "LOG_FORMAT"];

/// `POSECAST_<SECTION>_<KEY>` overrides: only the first `_` after the prefix
/// nests, so keys like `base_url` keep their underscores.
fn env_overrides() -> Env {
    Env::prefixed(ENV_PREFIX)
        .ignore(NON_CONFIG_VARS)
        .map(|key| key.as_str().replacen('_', ".", 1).into())
}

/// Config file location from `POSECAST_CONFIG`, falling back to `config.toml`.
pub fn config_path() -> PathBuf {
    resolve_config_path(std::env::var(CONFIG_PATH_VAR).ok())
}

fn resolve_config_path(value: Option<String>) -> PathBuf {
    match value {
        Some(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_CONFIG_PATH),
    }
}

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    Figment::new()
        .merge(Toml::file(path))
        .merge(env_overrides())
        .extract()
        .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
