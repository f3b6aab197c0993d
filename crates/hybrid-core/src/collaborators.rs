//! Trait interfaces for collaborators this crate consumes but does not own:
//! the audit log, the secret store, and the runtime identity signer. Each
//! lives in its own subsystem; this crate only needs a narrow contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::cloud::CloudProvider;

/// Errors a collaborator implementation may surface back to a caller.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    /// The audit sink could not accept an entry (storage full, backend
    /// unreachable, and similar).
    #[error("audit sink unavailable: {0}")]
    AuditUnavailable(String),
    /// The secret store has no credential for the requested provider.
    #[error("no credential configured for provider {0:?}")]
    CredentialNotFound(CloudProvider),
    /// Signing or verification failed.
    #[error("identity operation failed: {0}")]
    IdentityFailure(String),
}

/// The category of event being recorded, kept narrow and specific to this
/// subsystem rather than reusing a general-purpose action taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    /// The sanitizer redacted one or more PII patterns from a prompt.
    PiiRedaction,
    /// Sanitization ran but found nothing to redact.
    SanitizationPassed,
    /// The shadow router reached a routing decision.
    ShadowRouterDecision,
    /// A circuit breaker changed state.
    CircuitBreakerTransition,
    /// A fallback from the primary route to a secondary one occurred.
    FallbackTriggered,
    /// A resource sentinel preempted or restarted work.
    SentinelAction,
}

/// A consumer-facing handle onto the audit subsystem. This crate appends
/// structured events; it does not implement chain linking, signing, or
/// rotation, which belong to the audit subsystem itself.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Record one event. `source` names the component emitting it (for
    /// example `"shadow_router"` or `"circuit_breaker:anthropic"`);
    /// `details` is a free-form, already-redacted description.
    async fn log(
        &self,
        event_type: AuditEventType,
        source: &str,
        details: &str,
    ) -> Result<(), CollaboratorError>;
}

/// A no-op sink for configurations where audit logging is not wired up.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAuditSink;

#[async_trait]
impl AuditSink for NullAuditSink {
    async fn log(
        &self,
        _event_type: AuditEventType,
        _source: &str,
        _details: &str,
    ) -> Result<(), CollaboratorError> {
        Ok(())
    }
}

/// Source of provider API credentials. Implementations typically read from
/// OS keychains, environment variables, or an encrypted config file; none
/// of that is this crate's concern.
pub trait SecretStore: Send + Sync {
    /// Look up the credential for a provider, if one is configured.
    fn credential_for(&self, provider: CloudProvider) -> Option<String>;
}

/// Signs and verifies data on behalf of the runtime identity, used when a
/// caller needs to attach a verifiable signature to an execution result
/// (for example before handing it to the audit subsystem).
pub trait IdentitySigner: Send + Sync {
    /// Sign `data`, returning an opaque signature blob.
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, CollaboratorError>;

    /// Verify that `signature` was produced by this signer over `data`.
    fn verify(&self, data: &[u8], signature: &[u8]) -> Result<bool, CollaboratorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn null_sink_always_succeeds() {
        let sink = NullAuditSink;
        let result = sink
            .log(AuditEventType::PiiRedaction, "test", "redacted 1 email")
            .await;
        assert!(result.is_ok());
    }
}
