//! The runtime's unified error taxonomy. `HybridExecutionManager` maps
//! every internal error (router, local engine, cloud client, SLA guard)
//! through this type so callers see one taxonomy regardless of which
//! engine handled the request.

use thiserror::Error;

/// Errors surfaced by the hybrid execution manager.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The decision couldn't be honored (e.g. no model loaded, or the
    /// loaded model's class doesn't match the routed decision).
    #[error("routing failed: {0}")]
    RoutingFailed(String),

    /// Neither the local engine nor any cloud provider is usable.
    #[error("no engine available to serve this request")]
    AllEnginesUnavailable,

    /// The manager failed to initialize (e.g. no collaborators wired up).
    #[error("initialization failed: {0}")]
    InitializationFailed(String),

    /// No inference engine is configured at all.
    #[error("no inference engine available")]
    NoInferenceEngineAvailable,

    /// The primary route failed and its fallback also failed.
    #[error("both engines failed: local={local}, cloud={cloud}")]
    BothEnginesFailed {
        /// The local engine's failure.
        local: String,
        /// The cloud engine's failure.
        cloud: String,
    },

    /// The caller-supplied input failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The SLA envelope's timeout elapsed before completion.
    #[error("timeout exceeded after {0}s")]
    TimeoutExceeded(u64),

    /// The call was cancelled before completion.
    #[error("cancellation requested")]
    CancellationRequested,

    /// The call would exceed the SLA's memory budget.
    #[error("memory budget exceeded: limit={limit}mb, observed={observed}mb")]
    MemoryBudgetExceeded {
        /// The configured limit.
        limit: u64,
        /// The observed usage.
        observed: u64,
    },

    /// A deterministic SLA saw two different outputs for the same input
    /// within the same version window.
    #[error("deterministic violation: {0}")]
    DeterministicViolation(String),

    /// A generic execution failure not covered by a more specific variant.
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// The local engine reported an error.
    #[error("local engine error: {0}")]
    Local(#[from] hybrid_local::LocalEngineError),

    /// A cloud provider reported an error.
    #[error("cloud error: {0}")]
    Cloud(#[from] hybrid_cloud::CloudError),
}

/// A specialized `Result` for this crate.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
