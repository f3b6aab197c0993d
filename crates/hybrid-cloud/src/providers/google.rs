//! Google (Gemini) provider client.

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

const GOOGLE_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Google's hosted Gemini models.
pub struct GoogleClient {
    http: Client,
    api_key: String,
}

impl GoogleClient {
    /// Build a client with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self, config: &ProviderConfig, stream: bool) -> String {
        let base = config
            .base_url
            .clone()
            .unwrap_or_else(|| GOOGLE_API_BASE.to_string());
        let method = if stream { "streamGenerateContent" } else { "generateContent" };
        format!("{base}/{}:{method}?key={}", config.model(), self.api_key)
    }

    fn build_request(messages: &[Message], config: &ProviderConfig) -> Value {
        let contents: Vec<Value> = messages
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .map(|m| {
                serde_json::json!({
                    "role": match m.role {
                        MessageRole::Assistant => "model",
                        MessageRole::User | MessageRole::System => "user",
                    },
                    "parts": [{ "text": m.content }],
                })
            })
            .collect();

        serde_json::json!({
            "contents": contents,
            "generationConfig": {
                "maxOutputTokens": config.max_tokens,
                "temperature": config.temperature,
            },
        })
    }

    async fn checked_response(&self, url: &str, request_body: &Value) -> CloudResult<reqwest::Response> {
        let response = self.http.post(url).json(request_body).send().await?;
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if status.as_u16() == 429 {
            return Err(CloudError::RateLimited { retry_after_secs: 45 });
        }
        Err(CloudError::RequestFailed {
            status: status.as_u16(),
            body,
        })
    }
}

#[derive(Deserialize)]
struct GeminiChunk {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

fn parse_gemini_payload(payload: &str) -> Option<StreamEvent> {
    let chunk: GeminiChunk = serde_json::from_str(payload).ok()?;
    let candidate = chunk.candidates.into_iter().next()?;
    if let Some(reason) = candidate.finish_reason {
        return Some(StreamEvent::Finish { reason });
    }
    let text = candidate.content?.parts.into_iter().find_map(|p| p.text)?;
    Some(StreamEvent::Text { delta: text })
}

#[async_trait]
impl CloudProviderClient for GoogleClient {
    fn provider(&self) -> CloudProvider {
        CloudProvider::Google
    }

    fn has_credential(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn generate(&self, messages: &[Message], config: &ProviderConfig) -> CloudResult<String> {
        if !self.has_credential() {
            return Err(CloudError::CredentialNotConfigured {
                provider: "google".to_string(),
            });
        }
        let url = self.endpoint(config, false);
        let request_body = Self::build_request(messages, config);
        let response = self.checked_response(&url, &request_body).await?;
        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body)
            .map_err(|e| CloudError::InvalidResponse(format!("malformed JSON: {e}")))?;
        let text = value
            .get("candidates")
            .and_then(Value::as_array)
            .and_then(|c| c.first())
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(Value::as_array)
            .and_then(|parts| parts.first())
            .and_then(|p| p.get("text"))
            .and_then(Value::as_str)
            .ok_or_else(|| CloudError::InvalidResponse("no text part".to_string()))?;
        Ok(text.to_string())
    }

    async fn generate_streaming(&self, messages: &[Message], config: &ProviderConfig) -> CloudResult<StreamBox> {
        if !self.has_credential() {
            return Err(CloudError::CredentialNotConfigured {
                provider: "google".to_string(),
            });
        }
        let url = self.endpoint(config, true);
        let request_body = Self::build_request(messages, config);
        let response = self.checked_response(&url, &request_body).await?;

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
                    if let Some(event) = parse_line(&line, parse_gemini_payload) {
                        yield event;
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_text_part() {
        let event = parse_gemini_payload(r#"{"candidates":[{"content":{"parts":[{"text":"hi"}]}}]}"#);
        assert_eq!(event, Some(StreamEvent::Text { delta: "hi".to_string() }));
    }

    #[test]
    fn parses_finish_reason() {
        let event = parse_gemini_payload(r#"{"candidates":[{"finishReason":"STOP"}]}"#);
        assert_eq!(
            event,
            Some(StreamEvent::Finish {
                reason: "STOP".to_string()
            })
        );
    }

    #[test]
    fn client_without_key_reports_no_credential() {
        let client = GoogleClient::new("");
        assert!(!client.has_credential());
    }
}
