//! Generator client configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the remote generation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Base URL of the generation API (e.g., "http://127.0.0.1:8000").
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds. Image and video synthesis is slow.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Optional bearer token sent with every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_timeout() -> u64 {
    120
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            api_key: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.timeout_secs, 120);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_deserialize_minimal() {
        let toml = r#"
            base_url = "https://gen.example"
        "#;
        let config: GeneratorConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.base_url, "https://gen.example");
        assert_eq!(config.timeout_secs, 120);
    }
}
