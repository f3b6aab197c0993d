//! The organization's private-cloud deployment: an OpenAI-compatible
//! endpoint reachable without the loopback exemption, since it is already
//! inside the trust boundary safe-mode requires.

use async_trait::async_trait;
use hybrid_core::CloudProvider;

use super::openai_compat::OpenAiCompatClient;
use crate::client::{CloudProviderClient, StreamBox};
use crate::config::ProviderConfig;
use crate::error::CloudResult;
use crate::message::Message;

/// Client for the private-cloud deployment used under safe mode and for
/// privacy-sensitive traffic. Wraps an [`OpenAiCompatClient`] pointed at
/// the configured internal endpoint; this client always reports itself as
/// [`CloudProvider::PrivateCloud`] regardless of the wrapped client's wire
/// format.
pub struct PrivateCloudClient {
    inner: OpenAiCompatClient,
}

impl PrivateCloudClient {
    /// Build a client against the given internal endpoint.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            inner: OpenAiCompatClient::custom(base_url, api_key),
        }
    }
}

#[async_trait]
impl CloudProviderClient for PrivateCloudClient {
    fn provider(&self) -> CloudProvider {
        CloudProvider::PrivateCloud
    }

    fn has_credential(&self) -> bool {
        self.inner.has_credential()
    }

    async fn generate(&self, messages: &[Message], config: &ProviderConfig) -> CloudResult<String> {
        self.inner.generate(messages, config).await
    }

    async fn generate_streaming(&self, messages: &[Message], config: &ProviderConfig) -> CloudResult<StreamBox> {
        self.inner.generate_streaming(messages, config).await
    }
}
