//! Cloud transport error taxonomy.

use thiserror::Error;

/// Errors surfaced by a cloud provider client.
#[derive(Debug, Error)]
pub enum CloudError {
    /// No credential is installed for the requested provider.
    #[error("no credential configured for provider {provider}")]
    CredentialNotConfigured {
        /// Provider name.
        provider: String,
    },

    /// The request failed with a non-success HTTP status.
    #[error("request failed: status {status}, body {body}")]
    RequestFailed {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated to the response size cap.
        body: String,
    },

    /// The provider returned a 429.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds the provider asked the caller to wait.
        retry_after_secs: u64,
    },

    /// The circuit breaker for this provider is open.
    #[error("circuit breaker open for {provider}")]
    CircuitOpen {
        /// Provider name.
        provider: String,
    },

    /// The retry budget was exhausted without a successful attempt.
    #[error("retries exhausted after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// Number of attempts made, including the original.
        attempts: u32,
        /// The error from the final attempt.
        last_error: String,
    },

    /// The response body could not be parsed.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The response exceeded the configured size cap and was truncated.
    #[error("response exceeded size cap of {cap_bytes} bytes")]
    ResponseTooLarge {
        /// The configured cap, in bytes.
        cap_bytes: usize,
    },

    /// The underlying transport failed.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The configured API key is not a valid HTTP header value.
    #[error("invalid API key characters: {0}")]
    InvalidCredential(String),
}

impl CloudError {
    /// Whether this error is one the retry policy should act on (a
    /// transient failure, as opposed to a permanent misconfiguration).
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RequestFailed { status, .. } => hybrid_core::RetryPolicy::is_retryable_status(*status),
            Self::RateLimited { .. } => true,
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

/// Result type for cloud transport operations.
pub type CloudResult<T> = Result<T, CloudError>;
