//! Chat-completion client for the recommendation explanation.
//!
//! Speaks the OpenAI `POST /chat/completions` dialect, which most hosted and
//! local LLM gateways accept. There are no retries here: a failed call is
//! turned into a templated explanation by the caller.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("Missing API key (set OPENAI_API_KEY)")]
    MissingApiKey,

    #[error("Completion contained no message")]
    EmptyResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Returns the assistant message text of the first choice.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError>;

    fn model(&self) -> &str;
}

#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl ChatConfig {
    /// Build from the `[llm]` section; the key comes from `OPENAI_API_KEY`.
    pub fn from_settings(settings: &crate::config::LlmConfig) -> Self {
        Self {
            api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            base_url: settings.base_url.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            timeout_secs: settings.timeout_seconds,
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[derive(Debug, Clone)]
pub struct OpenAiChatClient {
    client: Client,
    config: ChatConfig,
}

impl OpenAiChatClient {
    pub fn new(config: ChatConfig) -> Result<Self, LlmError> {
        if config.api_key.is_empty() {
            return Err(LlmError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl ChatBackend for OpenAiChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let request = CompletionRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .ok()
                .and_then(|e| e.error)
                .map(|e| e.message)
                .unwrap_or(body);
            tracing::warn!(code = status.as_u16(), message = %message, "Chat completion failed");
            return Err(LlmError::Api {
                code: status.as_u16(),
                message,
            });
        }

        let body: CompletionResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: &str, api_key: &str) -> ChatConfig {
        ChatConfig {
            api_key: api_key.to_string(),
            base_url: base_url.to_string(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_tokens: 800,
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_complete_sends_messages_and_parses_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-3.5-turbo",
                "max_tokens": 800,
                "messages": [
                    { "role": "system", "content": "be helpful" },
                    { "role": "user", "content": "chest pain" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "role": "assistant", "content": "See a cardiologist." } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiChatClient::new(config(&server.uri(), "sk-test")).unwrap();
        let text = client
            .complete(&[ChatMessage::system("be helpful"), ChatMessage::user("chest pain")])
            .await
            .unwrap();
        assert_eq!(text, "See a cardiologist.");
        assert_eq!(client.model(), "gpt-3.5-turbo");
    }

    #[tokio::test]
    async fn test_api_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": { "message": "quota exceeded" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiChatClient::new(config(&server.uri(), "sk-test")).unwrap();
        match client.complete(&[ChatMessage::user("hi")]).await {
            Err(LlmError::Api { code, message }) => {
                assert_eq!(code, 429);
                assert_eq!(message, "quota exceeded");
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_choices_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
            )
            .mount(&server)
            .await;

        let client = OpenAiChatClient::new(config(&server.uri(), "sk-test")).unwrap();
        assert!(matches!(
            client.complete(&[ChatMessage::user("hi")]).await,
            Err(LlmError::EmptyResponse)
        ));
    }

    #[test]
    fn test_missing_api_key() {
        assert!(matches!(
            OpenAiChatClient::new(config("http://localhost", "")),
            Err(LlmError::MissingApiKey)
        ));
    }

    #[test]
    fn test_roles_serialize_lowercase() {
        let json = serde_json::to_value(ChatMessage::system("x")).unwrap();
        assert_eq!(json["role"], "system");
    }
}
