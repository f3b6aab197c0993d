//! Provider configuration.

use hybrid_core::{CloudModelTier, CloudProvider};

/// Configuration for a single cloud provider request.
#[derive(Clone)]
pub struct ProviderConfig {
    /// Which provider to target.
    pub provider: CloudProvider,
    /// Which tier to request within that provider.
    pub tier: CloudModelTier,
    /// The credential to authenticate with. Never logged or displayed.
    pub api_key: String,
    /// Override the default endpoint (used for `private_cloud` and tests).
    pub base_url: Option<String>,
    /// Maximum tokens to request.
    pub max_tokens: u32,
    /// Sampling temperature, clamped to `[0, 1]`.
    pub temperature: f32,
    /// Cap, in bytes, on the response body the client will buffer before
    /// truncating.
    pub response_size_cap_bytes: usize,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("tier", &self.tier)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("response_size_cap_bytes", &self.response_size_cap_bytes)
            .finish()
    }
}

impl ProviderConfig {
    /// Build a config for a provider and tier with no credential set.
    #[must_use]
    pub fn new(provider: CloudProvider, tier: CloudModelTier) -> Self {
        Self {
            provider,
            tier,
            api_key: String::new(),
            base_url: None,
            max_tokens: 4096,
            temperature: 0.7,
            response_size_cap_bytes: 1024 * 1024,
        }
    }

    /// Set the credential.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Override the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the max-tokens cap.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 1.0);
        self
    }

    /// The concrete model string this config resolves to.
    #[must_use]
    pub fn model(&self) -> &'static str {
        self.tier.model_for(self.provider)
    }

    /// A stable key identifying the host this config talks to, used to pick
    /// a circuit breaker.
    #[must_use]
    pub fn host_key(&self) -> String {
        format!("{:?}", self.provider).to_lowercase()
    }
}
