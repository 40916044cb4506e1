//! Model endpoint configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AiError, Result};

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_API_KEY_ENV: &str = "AGRI_SHIELD_API_KEY";

/// Checked after the configured variable.
const FALLBACK_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Settings for the hosted generative-language model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub endpoint: String,
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 60,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

impl GeminiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// `{endpoint}/models/{model}:generateContent`
    pub fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    /// Read the API key from the environment.
    pub fn resolve_api_key(&self) -> Result<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    /// Same as [`Self::resolve_api_key`] with a custom variable lookup.
    pub fn resolve_api_key_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
        [self.api_key_env.as_str(), FALLBACK_API_KEY_ENV]
            .into_iter()
            .filter_map(&lookup)
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
            .ok_or_else(|| AiError::MissingApiKey {
                env_var: self.api_key_env.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_endpoint_and_model() {
        let config = GeminiConfig {
            endpoint: "http://localhost:8080/v1beta/".to_string(),
            ..GeminiConfig::default()
        };
        assert_eq!(
            config.generate_url(),
            "http://localhost:8080/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn api_key_falls_back_to_gemini_variable() {
        let config = GeminiConfig::default();
        let key = config
            .resolve_api_key_with(|name| (name == "GEMINI_API_KEY").then(|| "k-123".to_string()))
            .unwrap();
        assert_eq!(key, "k-123");

        let err = config
            .resolve_api_key_with(|name| (name == DEFAULT_API_KEY_ENV).then(String::new))
            .unwrap_err();
        assert_eq!(err.to_string(), "no API key found; set AGRI_SHIELD_API_KEY");
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: GeminiConfig = serde_json::from_str(r#"{"model": "gemini-1.5-pro"}"#).unwrap();
        assert_eq!(config.model, "gemini-1.5-pro");
        assert_eq!(config.timeout_secs, 60);
    }
}
