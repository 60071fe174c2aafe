/// LLM Client: the single point of entry for all model provider calls.
///
/// ARCHITECTURAL RULE: No other module may call the provider directly.
/// Chat completions, text-to-speech and transcription all go through here.
///
/// Speaks the OpenAI-compatible wire format, so any provider exposing
/// `/v1/chat/completions`, `/v1/audio/speech` and `/v1/audio/transcriptions`
/// works. Connection details come from [`Config`].
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{multipart, Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

pub mod prompts;

const MAX_TOKENS: u32 = 1500;
const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// One chat turn. Also the shape of the `messages` form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// An audio clip uploaded for transcription.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub bytes: Bytes,
    pub file_name: String,
    pub content_type: String,
}

/// The model operations the interview flow needs.
///
/// Carried in `AppState` as `Arc<dyn InterviewModel>` so handlers can be
/// exercised against a stub.
#[async_trait]
pub trait InterviewModel: Send + Sync {
    /// Returns the text content of the first completion choice.
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, LlmError>;

    /// Synthesizes speech for `text`, returning encoded audio bytes.
    async fn speak(&self, text: &str) -> Result<Bytes, LlmError>;

    /// Transcribes an uploaded audio clip to text.
    async fn transcribe(&self, clip: AudioClip) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatCompletionResponse {
    /// Extracts the content of the first choice, if non-empty.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// The single model client used by all services.
/// Wraps the provider API with retry logic.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    tts_model: String,
    tts_voice: String,
    stt_model: String,
}

impl LlmClient {
    pub fn new(config: &Config) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            api_key: config.llm_api_key.clone(),
            base_url: config.llm_base_url.trim_end_matches('/').to_string(),
            model: config.llm_model.clone(),
            tts_model: config.tts_model.clone(),
            tts_voice: config.tts_voice.clone(),
            stt_model: config.stt_model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends the request built by `build`, retrying on 429 (rate limit) and
    /// 5xx errors with exponential backoff. `build` is called once per attempt.
    async fn send_with_retry<F>(&self, build: F) -> Result<Response, LlmError>
    where
        F: Fn() -> Result<RequestBuilder, LlmError>,
    {
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Provider call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = build()?.bearer_auth(&self.api_key).send().await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Provider returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message: provider_error_message(body),
                });
            }

            return Ok(response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }

    /// Makes a raw chat completion call, returning the full response object.
    pub async fn call(&self, messages: &[ChatMessage]) -> Result<ChatCompletionResponse, LlmError> {
        let request_body = ChatCompletionRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            temperature: 0.7,
            messages,
        };
        let url = self.url("/v1/chat/completions");

        let response = self
            .send_with_retry(|| Ok(self.client.post(&url).json(&request_body)))
            .await?;
        let completion: ChatCompletionResponse = response.json().await?;

        if let Some(usage) = &completion.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(completion)
    }
}

#[async_trait]
impl InterviewModel for LlmClient {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let completion = self.call(messages).await?;
        completion
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }

    async fn speak(&self, text: &str) -> Result<Bytes, LlmError> {
        let request_body = SpeechRequest {
            model: &self.tts_model,
            voice: &self.tts_voice,
            input: text,
        };
        let url = self.url("/v1/audio/speech");

        let response = self
            .send_with_retry(|| Ok(self.client.post(&url).json(&request_body)))
            .await?;
        let audio = response.bytes().await?;

        if audio.is_empty() {
            return Err(LlmError::EmptyContent);
        }
        debug!("Speech synthesized: {} bytes", audio.len());
        Ok(audio)
    }

    async fn transcribe(&self, clip: AudioClip) -> Result<String, LlmError> {
        let url = self.url("/v1/audio/transcriptions");

        let response = self
            .send_with_retry(|| {
                // Multipart forms are single-use, so each attempt builds a fresh one.
                let file = multipart::Part::bytes(clip.bytes.to_vec())
                    .file_name(clip.file_name.clone())
                    .mime_str(&clip.content_type)?;
                let form = multipart::Form::new()
                    .text("model", self.stt_model.clone())
                    .part("file", file);
                Ok(self.client.post(&url).multipart(form))
            })
            .await?;

        let transcription: TranscriptionResponse = response.json().await?;
        let text = transcription.text.trim().to_string();
        if text.is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(text)
    }
}

/// Pulls `error.message` out of a provider error body, falling back to the
/// raw body.
fn provider_error_message(body: String) -> String {
    serde_json::from_str::<ProviderError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_chat_message_roles_serialize_lowercase() {
        let json = serde_json::to_string(&ChatMessage::system("be brief")).unwrap();
        assert_eq!(json, r#"{"role":"system","content":"be brief"}"#);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let result = serde_json::from_str::<ChatMessage>(r#"{"role":"tool","content":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_completion_text_takes_first_choice() {
        let json = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "Score: 4/5"}},
                {"message": {"role": "assistant", "content": "ignored"}}
            ],
            "usage": {"prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17}
        }"#;
        let completion: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(completion.text(), Some("Score: 4/5"));
    }

    #[test]
    fn test_completion_text_blank_is_none() {
        let json = r#"{"choices": [{"message": {"content": "  "}}]}"#;
        let completion: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(completion.text(), None);

        let json = r#"{"choices": []}"#;
        let completion: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(completion.text(), None);
    }

    #[test]
    fn test_provider_error_message_parsed() {
        let body = r#"{"error": {"message": "Invalid API key", "type": "auth"}}"#.to_string();
        assert_eq!(provider_error_message(body), "Invalid API key");
    }

    #[test]
    fn test_provider_error_message_falls_back_to_body() {
        assert_eq!(provider_error_message("Bad gateway".to_string()), "Bad gateway");
    }

    #[test]
    fn test_client_trims_base_url() {
        let mut config = Config::for_tests();
        config.llm_base_url = "http://localhost:11434/".to_string();
        let client = LlmClient::new(&config).unwrap();
        assert_eq!(client.url("/v1/chat/completions"), "http://localhost:11434/v1/chat/completions");
        assert_eq!(client.model(), config.llm_model);
    }
}
