//! Dispatches to the cloud provider client matching a routed decision,
//! instead of the manager owning a single fixed client regardless of which
//! provider the router actually picked.

use std::collections::HashMap;
use std::sync::Arc;

use hybrid_cloud::CloudProviderClient;
use hybrid_core::CloudProvider;

/// One [`CloudProviderClient`] per configured provider, keyed by
/// [`CloudProviderClient::provider`]. Built once at startup and shared by
/// every call the manager makes.
#[derive(Default)]
pub struct CloudClients {
    by_provider: HashMap<CloudProvider, Arc<dyn CloudProviderClient>>,
}

impl CloudClients {
    /// Build a registry from a list of clients, keyed by each client's own
    /// `provider()`. A later duplicate of the same provider replaces an
    /// earlier one.
    #[must_use]
    pub fn new(clients: Vec<Arc<dyn CloudProviderClient>>) -> Self {
        let by_provider = clients.into_iter().map(|client| (client.provider(), client)).collect();
        Self { by_provider }
    }

    /// Build a registry around a single client, registered under its own
    /// `provider()`. Convenient for tests and single-provider deployments.
    #[must_use]
    pub fn single(client: Arc<dyn CloudProviderClient>) -> Self {
        Self::new(vec![client])
    }

    /// The client configured for `provider`, if any.
    #[must_use]
    pub fn get(&self, provider: CloudProvider) -> Option<Arc<dyn CloudProviderClient>> {
        self.by_provider.get(&provider).cloned()
    }

    /// Whether any configured client has a credential installed.
    #[must_use]
    pub fn any_has_credential(&self) -> bool {
        self.by_provider.values().any(|client| client.has_credential())
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use hybrid_cloud::{CloudResult, Message, ProviderConfig, StreamBox};

    use super::*;

    struct FixedClient {
        provider: CloudProvider,
        credential: bool,
    }

    #[async_trait]
    impl CloudProviderClient for FixedClient {
        fn provider(&self) -> CloudProvider {
            self.provider
        }

        fn has_credential(&self) -> bool {
            self.credential
        }

        async fn generate(&self, _messages: &[Message], _config: &ProviderConfig) -> CloudResult<String> {
            Ok(format!("{:?}", self.provider))
        }

        async fn generate_streaming(&self, _messages: &[Message], _config: &ProviderConfig) -> CloudResult<StreamBox> {
            unreachable!("not exercised by these tests")
        }
    }

    #[test]
    fn get_returns_the_client_registered_for_that_provider() {
        let anthropic = Arc::new(FixedClient {
            provider: CloudProvider::Anthropic,
            credential: true,
        });
        let private = Arc::new(FixedClient {
            provider: CloudProvider::PrivateCloud,
            credential: true,
        });
        let clients = CloudClients::new(vec![anthropic, private]);

        assert_eq!(clients.get(CloudProvider::Anthropic).unwrap().provider(), CloudProvider::Anthropic);
        assert_eq!(clients.get(CloudProvider::PrivateCloud).unwrap().provider(), CloudProvider::PrivateCloud);
        assert!(clients.get(CloudProvider::Google).is_none());
    }

    #[test]
    fn any_has_credential_is_false_when_every_client_lacks_one() {
        let client = Arc::new(FixedClient {
            provider: CloudProvider::OpenAi,
            credential: false,
        });
        let clients = CloudClients::new(vec![client]);
        assert!(!clients.any_has_credential());
    }
}
