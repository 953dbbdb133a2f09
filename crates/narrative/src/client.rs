use crate::error::NarrativeError;
use async_trait::async_trait;
use configuration::NarrativeSettings;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// One prompt to complete.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
}

/// The interface the narrator uses to reach an LLM, so tests can swap in a fake.
#[async_trait]
pub trait NarrativeClient: Send + Sync {
    /// Returns the generated text.
    async fn complete(&self, completion: &Completion) -> Result<String, NarrativeError>;

    /// Model id sent to the provider.
    fn model(&self) -> &str;
}

// --- Messages API payloads ---

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

/// A client for the Anthropic Messages API.
#[derive(Clone)]
pub struct AnthropicClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f64,
}

impl AnthropicClient {
    /// Builds a client from the `[narrative]` settings.
    ///
    /// Returns [`NarrativeError::NotConfigured`] when no API key is set, so the
    /// caller can run with narratives disabled.
    pub fn new(settings: &NarrativeSettings) -> Result<Self, NarrativeError> {
        let api_key = settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(NarrativeError::NotConfigured)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: settings.model.clone(),
            temperature: settings.temperature,
        })
    }
}

#[async_trait]
impl NarrativeClient for AnthropicClient {
    async fn complete(&self, completion: &Completion) -> Result<String, NarrativeError> {
        let url = format!("{}/v1/messages", self.base_url);
        let payload = MessagesRequest {
            model: &self.model,
            max_tokens: completion.max_tokens,
            temperature: self.temperature,
            system: &completion.system,
            messages: [Message {
                role: "user",
                content: &completion.prompt,
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to decode error response".to_string());
            return Err(NarrativeError::Upstream(status.as_u16(), error_text));
        }

        let body: MessagesResponse = response.json().await?;
        first_text(body).ok_or(NarrativeError::EmptyResponse)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn first_text(body: MessagesResponse) -> Option<String> {
    body.content
        .into_iter()
        .find(|block| block.kind == "text" && !block.text.trim().is_empty())
        .map(|block| block.text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_requires_an_api_key() {
        let settings = NarrativeSettings::default();
        assert!(matches!(AnthropicClient::new(&settings), Err(NarrativeError::NotConfigured)));

        let settings = NarrativeSettings {
            api_key: Some("sk-test".to_string()),
            base_url: "http://localhost:9999/".to_string(),
            ..NarrativeSettings::default()
        };
        let client = AnthropicClient::new(&settings).unwrap();
        assert_eq!(client.base_url, "http://localhost:9999");
        assert_eq!(client.model(), settings.model);
    }

    #[test]
    fn response_text_skips_non_text_blocks() {
        let body: MessagesResponse = serde_json::from_str(
            r#"{"content": [{"type": "tool_use", "id": "x"}, {"type": "text", "text": "Ann wins again."}]}"#,
        )
        .unwrap();
        assert_eq!(first_text(body).as_deref(), Some("Ann wins again."));

        let empty: MessagesResponse = serde_json::from_str(r#"{"content": []}"#).unwrap();
        assert_eq!(first_text(empty), None);
    }

    #[test]
    fn request_payload_shape() {
        let payload = MessagesRequest {
            model: "m",
            max_tokens: 150,
            temperature: 0.8,
            system: "sys",
            messages: [Message { role: "user", content: "hi" }],
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["max_tokens"], 150);
    }
}
