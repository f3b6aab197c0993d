//! Anthropic (Claude) provider client.

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

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic's hosted Claude models.
pub struct AnthropicClient {
    http: Client,
    api_key: String,
}

impl AnthropicClient {
    /// Build a client with the given API key. An empty key means
    /// `has_credential` reports false.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
        }
    }

    fn build_request(messages: &[Message], config: &ProviderConfig, stream: bool) -> Value {
        let system: Vec<&str> = messages
            .iter()
            .filter(|m| m.role == MessageRole::System)
            .map(|m| m.content.as_str())
            .collect();
        let api_messages: Vec<Value> = messages
            .iter()
            .filter(|m| m.role != MessageRole::System)
            .map(|m| {
                serde_json::json!({
                    "role": match m.role {
                        MessageRole::Assistant => "assistant",
                        MessageRole::User | MessageRole::System => "user",
                    },
                    "content": m.content,
                })
            })
            .collect();

        let mut request = serde_json::json!({
            "model": config.model(),
            "max_tokens": config.max_tokens,
            "temperature": config.temperature,
            "messages": api_messages,
            "stream": stream,
        });
        if !system.is_empty() {
            request["system"] = Value::String(system.join("\n"));
        }
        request
    }

    fn auth_header(&self) -> CloudResult<reqwest::header::HeaderValue> {
        let mut header = reqwest::header::HeaderValue::try_from(&self.api_key)
            .map_err(|e| CloudError::InvalidCredential(e.to_string()))?;
        header.set_sensitive(true);
        Ok(header)
    }

    async fn checked_response(
        &self,
        config: &ProviderConfig,
        request_body: &Value,
    ) -> CloudResult<reqwest::Response> {
        let url = config.base_url.as_deref().unwrap_or(ANTHROPIC_API_URL);
        let response = self
            .http
            .post(url)
            .header("x-api-key", self.auth_header()?)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(request_body)
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if status.as_u16() == 429 {
            return Err(CloudError::RateLimited { retry_after_secs: 60 });
        }
        Err(CloudError::RequestFailed {
            status: status.as_u16(),
            body,
        })
    }
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamingEvent {
    ContentBlockDelta { delta: Delta },
    MessageStop,
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Delta {
    TextDelta { text: String },
    #[serde(other)]
    Other,
}

fn parse_anthropic_payload(payload: &str) -> Option<StreamEvent> {
    match serde_json::from_str::<StreamingEvent>(payload).ok()? {
        StreamingEvent::ContentBlockDelta {
            delta: Delta::TextDelta { text },
        } => Some(StreamEvent::Text { delta: text }),
        StreamingEvent::MessageStop => Some(StreamEvent::Finish {
            reason: "stop".to_string(),
        }),
        _ => None,
    }
}

#[async_trait]
impl CloudProviderClient for AnthropicClient {
    fn provider(&self) -> CloudProvider {
        CloudProvider::Anthropic
    }

    fn has_credential(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn generate(&self, messages: &[Message], config: &ProviderConfig) -> CloudResult<String> {
        if !self.has_credential() {
            return Err(CloudError::CredentialNotConfigured {
                provider: "anthropic".to_string(),
            });
        }
        let request_body = Self::build_request(messages, config, false);
        let response = self.checked_response(config, &request_body).await?;
        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body)
            .map_err(|e| CloudError::InvalidResponse(format!("malformed JSON: {e}")))?;
        let text = value
            .get("content")
            .and_then(Value::as_array)
            .and_then(|blocks| blocks.first())
            .and_then(|block| block.get("text"))
            .and_then(Value::as_str)
            .ok_or_else(|| CloudError::InvalidResponse("no text content block".to_string()))?;
        Ok(text.to_string())
    }

    async fn generate_streaming(&self, messages: &[Message], config: &ProviderConfig) -> CloudResult<StreamBox> {
        if !self.has_credential() {
            return Err(CloudError::CredentialNotConfigured {
                provider: "anthropic".to_string(),
            });
        }
        let request_body = Self::build_request(messages, config, true);
        let response = self.checked_response(config, &request_body).await?;

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
                    if let Some(event) = parse_line(&line, parse_anthropic_payload) {
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
    fn build_request_separates_system_from_messages() {
        let messages = vec![Message::user("hi"), Message {
            role: MessageRole::System,
            content: "be terse".to_string(),
        }];
        let config = ProviderConfig::new(CloudProvider::Anthropic, hybrid_core::CloudModelTier::Normal);
        let request = AnthropicClient::build_request(&messages, &config, false);
        assert_eq!(request["system"], "be terse");
        assert_eq!(request["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn client_without_key_reports_no_credential() {
        let client = AnthropicClient::new("");
        assert!(!client.has_credential());
    }

    #[test]
    fn client_with_key_reports_credential() {
        let client = AnthropicClient::new("sk-ant-test");
        assert!(client.has_credential());
    }

    #[test]
    fn parses_text_delta_and_stop() {
        assert_eq!(
            parse_anthropic_payload(r#"{"type":"content_block_delta","delta":{"type":"text_delta","text":"hi"}}"#),
            Some(StreamEvent::Text { delta: "hi".to_string() })
        );
        assert_eq!(
            parse_anthropic_payload(r#"{"type":"message_stop"}"#),
            Some(StreamEvent::Finish {
                reason: "stop".to_string()
            })
        );
    }

    #[test]
    fn malformed_payload_parses_to_none() {
        assert_eq!(parse_anthropic_payload("{not json"), None);
    }
}
