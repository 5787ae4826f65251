//! Generative model clients.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::AiConfig;
use crate::error::AiError;

/// Something that turns a prompt into free text.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Generate a completion for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;
}

/// Google Generative Language API client.
#[derive(Clone)]
pub struct GeminiClient {
    /// HTTP client
    client: Client,

    /// API base URL
    endpoint: String,

    /// Model name
    model: String,

    /// API key
    api_key: String,
}

impl GeminiClient {
    /// Create a client from configuration. Fails without an API key.
    pub fn from_config(config: &AiConfig) -> Result<Self, AiError> {
        let api_key = config.api_key.clone().ok_or(AiError::MissingApiKey)?;
        let client = ClientBuilder::new().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        )
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

fn first_candidate_text(response: GenerateResponse) -> Option<String> {
    let content = response.candidates.into_iter().next()?.content?;
    let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
    (!text.trim().is_empty()).then_some(text)
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let payload = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        debug!(model = %self.model, prompt_len = prompt.len(), "Calling generative model");

        let response = self
            .client
            .post(self.url())
            .query(&[("key", &self.api_key)])
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Status { status, body });
        }

        let data: GenerateResponse = response.json().await?;
        first_candidate_text(data).ok_or(AiError::EmptyResponse)
    }
}

/// A client that never answers; used when no API key is configured so every
/// request goes straight to the fallback heuristics.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineClient;

#[async_trait]
impl ModelClient for OfflineClient {
    async fn generate(&self, _prompt: &str) -> Result<String, AiError> {
        Err(AiError::MissingApiKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_candidate_text_joins_parts() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"{\"a\":"},{"text":"1}"}]}},
                {"content":{"parts":[{"text":"ignored"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(first_candidate_text(response).as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_first_candidate_text_empty() {
        let response: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(first_candidate_text(response).is_none());

        let response: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert!(first_candidate_text(response).is_none());
    }

    #[test]
    fn test_from_config_requires_key() {
        assert!(matches!(
            GeminiClient::from_config(&AiConfig::default()),
            Err(AiError::MissingApiKey)
        ));

        let client = GeminiClient::from_config(&AiConfig::default().with_api_key("k")).unwrap();
        assert_eq!(
            client.url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-pro:generateContent"
        );
    }

    #[tokio::test]
    async fn test_offline_client_always_fails() {
        assert!(matches!(
            OfflineClient.generate("anything").await,
            Err(AiError::MissingApiKey)
        ));
    }
}
