//! Mock implementations of the collaborator traits, for tests that need to
//! observe what the core writes to them without a real backing subsystem.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use hybrid_cloud::{CloudError, CloudProviderClient, CloudResult, Message, ProviderConfig, StreamBox};
use hybrid_core::{AuditEventType, AuditSink, CloudProvider, CollaboratorError, IdentitySigner, SecretStore};

/// One audit entry as recorded by [`RecordingAuditSink`].
#[derive(Debug, Clone)]
pub struct RecordedAuditEntry {
    /// The event type logged.
    pub event_type: AuditEventType,
    /// The component that logged it.
    pub source: String,
    /// The free-form details attached.
    pub details: String,
}

/// An [`AuditSink`] that records every entry in order, for asserting on
/// ordering (e.g. "the redaction entry precedes the outbound request") and
/// counts (e.g. "exactly one `pii_redaction` entry").
#[derive(Debug, Default)]
pub struct RecordingAuditSink {
    entries: Mutex<Vec<RecordedAuditEntry>>,
}

impl RecordingAuditSink {
    /// Build an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every entry recorded so far, in order.
    #[must_use]
    pub fn entries(&self) -> Vec<RecordedAuditEntry> {
        self.entries.lock().expect("audit sink mutex poisoned").clone()
    }

    /// How many entries of the given type were recorded.
    #[must_use]
    pub fn count_of(&self, event_type: AuditEventType) -> usize {
        self.entries()
            .iter()
            .filter(|entry| entry.event_type == event_type)
            .count()
    }
}

#[async_trait]
impl AuditSink for RecordingAuditSink {
    async fn log(&self, event_type: AuditEventType, source: &str, details: &str) -> Result<(), CollaboratorError> {
        self.entries
            .lock()
            .expect("audit sink mutex poisoned")
            .push(RecordedAuditEntry {
                event_type,
                source: source.to_string(),
                details: details.to_string(),
            });
        Ok(())
    }
}

/// A [`CloudProviderClient`] that returns a scripted sequence of responses
/// and records every request it was sent, for asserting on both the
/// response path and "did the call actually happen" ordering questions.
pub struct ScriptedCloudClient {
    provider: CloudProvider,
    has_credential: bool,
    responses: Mutex<VecDeque<CloudResult<String>>>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedCloudClient {
    /// Build a client for `provider` with a credential installed and no
    /// scripted responses (calls return a deterministic echo).
    #[must_use]
    pub fn new(provider: CloudProvider) -> Self {
        Self {
            provider,
            has_credential: true,
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Build a client reporting no installed credential.
    #[must_use]
    pub fn without_credential(provider: CloudProvider) -> Self {
        Self {
            has_credential: false,
            ..Self::new(provider)
        }
    }

    /// Queue a successful response.
    #[must_use]
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.responses.lock().expect("mutex poisoned").push_back(Ok(text.into()));
        self
    }

    /// Queue a failing response.
    #[must_use]
    pub fn with_error(self, error: CloudError) -> Self {
        self.responses.lock().expect("mutex poisoned").push_back(Err(error));
        self
    }

    /// Every request this client received, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().expect("mutex poisoned").clone()
    }

    /// How many requests this client received.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("mutex poisoned").len()
    }
}

#[async_trait]
impl CloudProviderClient for ScriptedCloudClient {
    fn provider(&self) -> CloudProvider {
        self.provider
    }

    fn has_credential(&self) -> bool {
        self.has_credential
    }

    async fn generate(&self, messages: &[Message], _config: &ProviderConfig) -> CloudResult<String> {
        self.requests.lock().expect("mutex poisoned").push(messages.to_vec());
        self.responses
            .lock()
            .expect("mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| Ok("scripted default response".to_string()))
    }

    async fn generate_streaming(&self, _messages: &[Message], _config: &ProviderConfig) -> CloudResult<StreamBox> {
        unreachable!("ScriptedCloudClient is used for non-streaming tests only")
    }
}

/// A [`SecretStore`] backed by an in-memory map, for tests that need a
/// credential present for exactly one provider.
#[derive(Debug, Default)]
pub struct MockSecretStore {
    credentials: HashMap<CloudProvider, String>,
}

impl MockSecretStore {
    /// Build an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a credential for `provider`.
    #[must_use]
    pub fn with_credential(mut self, provider: CloudProvider, token: impl Into<String>) -> Self {
        self.credentials.insert(provider, token.into());
        self
    }
}

impl SecretStore for MockSecretStore {
    fn credential_for(&self, provider: CloudProvider) -> Option<String> {
        self.credentials.get(&provider).cloned()
    }
}

/// Shares a single [`AuditSink`] across collaborators that each need to own
/// their audit handle by value (e.g. [`hybrid_router::ShadowRouter`]), so a
/// test can still inspect what was logged afterward.
#[async_trait]
impl<T: AuditSink + ?Sized> AuditSink for std::sync::Arc<T> {
    async fn log(&self, event_type: AuditEventType, source: &str, details: &str) -> Result<(), CollaboratorError> {
        (**self).log(event_type, source, details).await
    }
}

/// An [`IdentitySigner`] that "signs" by appending a fixed tag, sufficient
/// for tests asserting round-trip verification without a real key.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockIdentitySigner;

const SIGNATURE_TAG: &[u8] = b":mock-signature";

impl IdentitySigner for MockIdentitySigner {
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, CollaboratorError> {
        let mut signature = data.to_vec();
        signature.extend_from_slice(SIGNATURE_TAG);
        Ok(signature)
    }

    fn verify(&self, data: &[u8], signature: &[u8]) -> Result<bool, CollaboratorError> {
        let expected = self.sign(data)?;
        Ok(expected == signature)
    }
}
