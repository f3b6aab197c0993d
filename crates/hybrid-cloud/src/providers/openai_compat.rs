//! OpenAI and OpenAI-compatible (local, self-hosted) provider client.

use async_stream::try_stream;
use async_trait::async_trait;
use futures::StreamExt;
use hybrid_core::{CloudProvider, StreamEvent};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::client::{CloudProviderClient, StreamBox};
use crate::config::ProviderConfig;
use crate::error::{CloudError, CloudResult};
use crate::message::{Message, MessageRole};
use crate::sse::{parse_line, LineBuffer};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Whether a base URL points at a loopback address, and therefore needs no
/// credential (local inference servers like LM Studio accept any key).
fn is_local_url(url: &str) -> bool {
    url.contains("localhost") || url.contains("127.0.0.1") || url.contains("[::1]")
}

/// OpenAI or an OpenAI-compatible HTTP endpoint.
pub struct OpenAiCompatClient {
    http: Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenAiCompatClient {
    /// Build a client against the official OpenAI endpoint.
    #[must_use]
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_key: Some(api_key.into()),
            base_url: OPENAI_API_URL.to_string(),
        }
    }

    /// Build a client against a custom OpenAI-compatible endpoint.
    #[must_use]
    pub fn custom(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: Client::new(),
            api_key,
            base_url: base_url.into(),
        }
    }

    fn build_request(messages: &[Message], config: &ProviderConfig, stream: bool) -> Value {
        let api_messages: Vec<Value> = messages
            .iter()
            .map(|m| {
                serde_json::json!({
                    "role": match m.role {
                        MessageRole::User => "user",
                        MessageRole::Assistant => "assistant",
                        MessageRole::System => "system",
                    },
                    "content": m.content,
                })
            })
            .collect();

        serde_json::json!({
            "model": config.model(),
            "messages": api_messages,
            "max_tokens": config.max_tokens,
            "temperature": config.temperature,
            "stream": stream,
        })
    }

    async fn checked_response(&self, request_body: &Value) -> CloudResult<reqwest::Response> {
        let mut request = self.http.post(&self.base_url).json(request_body);
        if let Some(key) = &self.api_key {
            if !key.is_empty() {
                let mut header = reqwest::header::HeaderValue::try_from(format!("Bearer {key}"))
                    .map_err(|e| CloudError::InvalidCredential(e.to_string()))?;
                header.set_sensitive(true);
                request = request.header("authorization", header);
            }
        }
        let response = request.send().await?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if status.as_u16() == 429 {
            return Err(CloudError::RateLimited { retry_after_secs: 30 });
        }
        Err(CloudError::RequestFailed {
            status: status.as_u16(),
            body,
        })
    }
}

#[derive(Deserialize)]
struct StreamChunk {
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    delta: Delta,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Default)]
struct Delta {
    content: Option<String>,
}

fn parse_openai_payload(payload: &str) -> Option<StreamEvent> {
    let chunk: StreamChunk = serde_json::from_str(payload).ok()?;
    let choice = chunk.choices.into_iter().next()?;
    if let Some(reason) = choice.finish_reason {
        return Some(StreamEvent::Finish { reason });
    }
    choice.delta.content.map(|delta| StreamEvent::Text { delta })
}

#[async_trait]
impl CloudProviderClient for OpenAiCompatClient {
    fn provider(&self) -> CloudProvider {
        CloudProvider::OpenAi
    }

    fn has_credential(&self) -> bool {
        is_local_url(&self.base_url) || self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    async fn generate(&self, messages: &[Message], config: &ProviderConfig) -> CloudResult<String> {
        if !self.has_credential() {
            return Err(CloudError::CredentialNotConfigured {
                provider: "openai".to_string(),
            });
        }
        let request_body = Self::build_request(messages, config, false);
        let response = self.checked_response(&request_body).await?;
        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body)
            .map_err(|e| CloudError::InvalidResponse(format!("malformed JSON: {e}")))?;
        let text = value
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(Value::as_str)
            .ok_or_else(|| CloudError::InvalidResponse("no message content".to_string()))?;
        Ok(text.to_string())
    }

    async fn generate_streaming(&self, messages: &[Message], config: &ProviderConfig) -> CloudResult<StreamBox> {
        if !self.has_credential() {
            return Err(CloudError::CredentialNotConfigured {
                provider: "openai".to_string(),
            });
        }
        let request_body = Self::build_request(messages, config, true);
        let response = self.checked_response(&request_body).await?;

        let cap_bytes = config.response_size_cap_bytes;
        let stream = try_stream! {
            let mut bytes_stream = response.bytes_stream();
            let mut buffer = LineBuffer::new();
            let mut received = 0usize;

            while let Some(chunk) = bytes_stream.next().await {
                let chunk = chunk?;
                received += chunk.len();
                if received > cap_bytes {
                    Err(CloudError::ResponseTooLarge { cap_bytes })?;
                }
                for line in buffer.feed(&chunk) {
                    if let Some(event) = parse_line(&line, parse_openai_payload) {
                        yield event;
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}
