use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};

use crate::generator::GeneratorConfig;
use crate::orchestrator::OrchestratorConfig;
use crate::placeholder::PlaceholderConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub placeholders: PlaceholderConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest accepted image upload request, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub generator: SanitizedGeneratorConfig,
    pub placeholders: PlaceholderConfig,
    pub orchestrator: OrchestratorConfig,
}

/// Sanitized generator config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedGeneratorConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub api_key_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            generator: SanitizedGeneratorConfig {
                base_url: config.generator.base_url.clone(),
                timeout_secs: config.generator.timeout_secs,
                api_key_configured: config
                    .generator
                    .api_key
                    .as_deref()
                    .is_some_and(|key| !key.is_empty()),
            },
            placeholders: config.placeholders.clone(),
            orchestrator: config.orchestrator.clone(),
        }
    }
}
