//! Explanation service configuration (`[explanation]` section).

use serde::{Deserialize, Serialize};

/// Settings of the hosted model used for advisory explanations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationConfig {
    /// API key; enrichment is disabled when absent (default: none, `GEMINI_API_KEY` overrides)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model name (default: "gemini-2.0-flash")
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the generative language API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Whole-request timeout in seconds (default: 15)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds (default: 5)
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_connect_timeout_secs() -> u64 {
    5
}

impl Default for ExplanationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl ExplanationConfig {
    /// Key to use, blank keys count as missing
    pub fn effective_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExplanationConfig::default();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.timeout_secs, 15);
        assert_eq!(config.effective_api_key(), None);
    }

    #[test]
    fn test_blank_key_is_missing() {
        let config = ExplanationConfig {
            api_key: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.effective_api_key(), None);
    }
}
