//! Model client configuration.

use std::time::Duration;

/// Default hosted model.
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

/// Default API base URL.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Configuration for the generative model and the assistant around it.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// API key; without one the assistant runs the fallbacks only
    pub api_key: Option<String>,
    /// Model name
    pub model: String,
    /// API base URL
    pub endpoint: String,
    /// Upper bound on a single model call
    pub timeout: Duration,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl AiConfig {
    /// Read `EVENTDESK_AI_API_KEY`, `EVENTDESK_AI_MODEL`,
    /// `EVENTDESK_AI_ENDPOINT` and `EVENTDESK_AI_TIMEOUT_SECS`, keeping
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        config.api_key = lookup("EVENTDESK_AI_API_KEY").filter(|k| !k.trim().is_empty());
        if let Some(model) = lookup("EVENTDESK_AI_MODEL") {
            config.model = model;
        }
        if let Some(endpoint) = lookup("EVENTDESK_AI_ENDPOINT") {
            config.endpoint = endpoint.trim_end_matches('/').to_string();
        }
        if let Some(secs) = lookup("EVENTDESK_AI_TIMEOUT_SECS").and_then(|s| s.parse::<u64>().ok()) {
            config.timeout = Duration::from_secs(secs);
        }
        config
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
