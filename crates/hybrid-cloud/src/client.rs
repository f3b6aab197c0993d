//! The cloud provider client trait and the retry/breaker orchestration
//! wrapped around it.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use hybrid_core::{CloudProvider, RetryPolicy, StreamEvent};

use crate::error::{CloudError, CloudResult};
use crate::message::Message;
use crate::registry::CircuitBreakerRegistry;
use crate::ProviderConfig;

/// A boxed, single-pass stream of [`StreamEvent`]s. Finite, not
/// restartable; dropping it closes the underlying transport.
pub type StreamBox = Pin<Box<dyn Stream<Item = CloudResult<StreamEvent>> + Send>>;

/// Translates a `(messages, configuration)` pair into a provider-specific
/// request, streams the response, and reports its own credential status.
///
/// Implementors do not apply retry or circuit breaking themselves; that is
/// layered on top by [`generate_with_retry`].
#[async_trait]
pub trait CloudProviderClient: Send + Sync {
    /// The provider this client talks to.
    fn provider(&self) -> CloudProvider;

    /// Whether a credential is installed for this client.
    fn has_credential(&self) -> bool;

    /// Non-streaming generation: accumulates the stream internally and
    /// returns the concatenated text.
    async fn generate(&self, messages: &[Message], config: &ProviderConfig) -> CloudResult<String>;

    /// Streaming generation. The returned stream is finite and single-pass;
    /// cancelling consumption closes the underlying transport.
    async fn generate_streaming(&self, messages: &[Message], config: &ProviderConfig) -> CloudResult<StreamBox>;
}

/// `generate`, wrapped with the shared exponential backoff [`RetryPolicy`]
/// and the per-host circuit breaker from `breakers`.
///
/// Consults `breakers.breaker_for(config.host_key())` before issuing any
/// request: if the breaker is open, returns [`CloudError::CircuitOpen`]
/// without touching the network. Every attempt records its outcome back to
/// the breaker, so a host that starts failing mid-retry-budget opens for
/// the *next* caller even if this call eventually succeeds.
///
/// Only errors [`CloudError::is_retryable`] reports as transient consume a
/// retry attempt; everything else returns immediately.
pub async fn generate_with_retry(
    client: &dyn CloudProviderClient,
    messages: &[Message],
    config: &ProviderConfig,
    policy: &RetryPolicy,
    breakers: &CircuitBreakerRegistry,
) -> CloudResult<String> {
    let breaker = breakers.breaker_for(&config.host_key()).await;
    if !breaker.can_execute().await {
        return Err(CloudError::CircuitOpen {
            provider: config.host_key(),
        });
    }

    let mut attempt = 0u32;
    loop {
        match client.generate(messages, config).await {
            Ok(text) => {
                breaker.record_success().await;
                return Ok(text);
            }
            Err(err) if err.is_retryable() && policy.should_retry(attempt) => {
                breaker.record_failure().await;
                tracing::warn!(attempt, error = %err, "retrying cloud request");
                tokio::time::sleep(policy.delay(attempt)).await;
                attempt += 1;
            }
            Err(err) if err.is_retryable() => {
                breaker.record_failure().await;
                return Err(CloudError::RetriesExhausted {
                    attempts: attempt + 1,
                    last_error: err.to_string(),
                });
            }
            Err(err) => {
                breaker.record_failure().await;
                return Err(err);
            }
        }
    }
}

/// Whether any provider in `clients` has a credential installed.
#[must_use]
pub fn has_any_provider(clients: &[&dyn CloudProviderClient]) -> bool {
    clients.iter().any(|c| c.has_credential())
}

/// The first provider in `clients` with a credential installed, in the
/// given ordering.
pub fn preferred_provider<'a>(clients: &[&'a dyn CloudProviderClient]) -> Option<&'a dyn CloudProviderClient> {
    clients.iter().find(|c| c.has_credential()).copied()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use futures::stream;

    use super::*;

    struct ScriptedClient {
        provider: CloudProvider,
        credential: bool,
        failures_then_success: AtomicU32,
    }

    #[async_trait]
    impl CloudProviderClient for ScriptedClient {
        fn provider(&self) -> CloudProvider {
            self.provider
        }

        fn has_credential(&self) -> bool {
            self.credential
        }

        async fn generate(&self, _messages: &[Message], _config: &ProviderConfig) -> CloudResult<String> {
            let remaining = self.failures_then_success.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures_then_success.fetch_sub(1, Ordering::SeqCst);
                return Err(CloudError::RequestFailed {
                    status: 503,
                    body: "temporarily unavailable".to_string(),
                });
            }
            Ok("ok".to_string())
        }

        async fn generate_streaming(&self, _messages: &[Message], _config: &ProviderConfig) -> CloudResult<StreamBox> {
            Ok(Box::pin(stream::empty()))
        }
    }

    #[tokio::test]
    async fn retry_succeeds_after_transient_failures() {
        let client = ScriptedClient {
            provider: CloudProvider::Anthropic,
            credential: true,
            failures_then_success: AtomicU32::new(2),
        };
        let config = ProviderConfig::new(CloudProvider::Anthropic, hybrid_core::CloudModelTier::Normal);
        let policy = RetryPolicy::new(
            std::time::Duration::from_millis(1),
            2.0,
            std::time::Duration::from_millis(10),
            3,
        );

        let breakers = CircuitBreakerRegistry::new();
        let result = generate_with_retry(&client, &[], &config, &policy, &breakers).await;
        assert_eq!(result.unwrap(), "ok");
    }

    #[tokio::test]
    async fn retry_gives_up_after_max_retries() {
        let client = ScriptedClient {
            provider: CloudProvider::Anthropic,
            credential: true,
            failures_then_success: AtomicU32::new(100),
        };
        let config = ProviderConfig::new(CloudProvider::Anthropic, hybrid_core::CloudModelTier::Normal);
        let policy = RetryPolicy::new(
            std::time::Duration::from_millis(1),
            2.0,
            std::time::Duration::from_millis(5),
            2,
        );

        let breakers = CircuitBreakerRegistry::new();
        let result = generate_with_retry(&client, &[], &config, &policy, &breakers).await;
        assert!(matches!(result, Err(CloudError::RetriesExhausted { attempts: 3, .. })));
    }

    #[tokio::test]
    async fn an_open_breaker_short_circuits_without_issuing_a_request() {
        let client = ScriptedClient {
            provider: CloudProvider::Anthropic,
            credential: true,
            failures_then_success: AtomicU32::new(0),
        };
        let config = ProviderConfig::new(CloudProvider::Anthropic, hybrid_core::CloudModelTier::Normal);
        let policy = RetryPolicy::new(std::time::Duration::from_millis(1), 2.0, std::time::Duration::from_millis(5), 0);
        let breakers = CircuitBreakerRegistry::with_config(1, std::time::Duration::from_secs(60));
        let breaker = breakers.breaker_for(&config.host_key()).await;
        breaker.record_failure().await;
        assert!(!breaker.is_closed().await);

        let result = generate_with_retry(&client, &[], &config, &policy, &breakers).await;
        assert!(matches!(result, Err(CloudError::CircuitOpen { .. })));
    }

    #[tokio::test]
    async fn preferred_provider_picks_the_first_with_credentials() {
        let without = Arc::new(ScriptedClient {
            provider: CloudProvider::OpenAi,
            credential: false,
            failures_then_success: AtomicU32::new(0),
        });
        let with = Arc::new(ScriptedClient {
            provider: CloudProvider::Anthropic,
            credential: true,
            failures_then_success: AtomicU32::new(0),
        });

        let clients: Vec<&dyn CloudProviderClient> = vec![without.as_ref(), with.as_ref()];
        assert!(has_any_provider(&clients));
        assert_eq!(preferred_provider(&clients).unwrap().provider(), CloudProvider::Anthropic);
    }
}
