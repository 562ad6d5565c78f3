use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use analysis_domain::{DomainError, GenerationRequest, TextGenerationPort};

use crate::prompt::{build_user_prompt, SYSTEM_PERSONA};

const SERVICE: &str = "text-generation";

#[derive(Debug, Clone)]
pub struct ChatGeneratorConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub request_timeout: Duration,
}

impl Default for ChatGeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            request_timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Text generator backed by an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiChatGenerator {
    client: reqwest::Client,
    config: ChatGeneratorConfig,
}

impl OpenAiChatGenerator {
    pub fn new(config: ChatGeneratorConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    async fn send(&self, request: &GenerationRequest) -> Result<String, DomainError> {
        let prompt = build_user_prompt(request);
        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PERSONA,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let mut builder = self.client.post(self.endpoint()).json(&body);
        if let Some(api_key) = self.config.api_key.as_deref() {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| DomainError::external_service_error(SERVICE, err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DomainError::external_service_error(
                SERVICE,
                format!("status {status}: {detail}"),
            ));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|err| {
            DomainError::external_service_error(SERVICE, format!("invalid response body: {err}"))
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| DomainError::external_service_error(SERVICE, "response carried no text"))
    }
}

#[async_trait]
impl TextGenerationPort for OpenAiChatGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, DomainError> {
        tracing::debug!(
            model = %self.config.model,
            target_marker_count = request.target_marker_count,
            transcript_chars = request.transcript.chars().count(),
            "requesting paragraph generation"
        );

        let text = tokio::time::timeout(self.config.request_timeout, self.send(&request))
            .await
            .map_err(|_| {
                DomainError::external_service_error(
                    SERVICE,
                    format!("timed out after {:?}", self.config.request_timeout),
                )
            })??;

        tracing::debug!(generated_chars = text.chars().count(), "paragraph generated");
        Ok(text)
    }
}
