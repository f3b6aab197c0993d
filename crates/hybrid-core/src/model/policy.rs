//! Security policy.

use serde::{Deserialize, Serialize};

/// The execution policy in effect, gating router decisions before any other
/// signal is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionPolicy {
    /// Normal operation: all gates apply.
    #[default]
    Balanced,
    /// All work goes to the private-cloud provider regardless of any other
    /// signal.
    SafeMode,
    /// Only local execution is attempted.
    LocalOnly,
    /// Only cloud execution is attempted.
    CloudOnly,
}

/// The active security policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SecurityPolicy {
    /// The execution policy.
    pub execution_policy: ExecutionPolicy,
}

impl SecurityPolicy {
    /// Build a policy with the given execution mode.
    #[must_use]
    pub fn new(execution_policy: ExecutionPolicy) -> Self {
        Self { execution_policy }
    }

    /// Shorthand for the default, unrestricted policy.
    #[must_use]
    pub fn balanced() -> Self {
        Self::new(ExecutionPolicy::Balanced)
    }

    /// Shorthand for the safe-mode policy.
    #[must_use]
    pub fn safe_mode() -> Self {
        Self::new(ExecutionPolicy::SafeMode)
    }
}
