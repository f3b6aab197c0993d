//! Router outputs: the target model class and the routing decision.

use serde::{Deserialize, Serialize};

use super::cloud::CloudProvider;

/// A local model size class, used both for selection and for VRAM-fit
/// checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelClass {
    /// A small model, runs on nearly any accelerator.
    Small,
    /// A medium model, needs a meaningful VRAM budget.
    Medium,
    /// A large model, needs a generous VRAM budget and benefits most from
    /// accelerator-specific kernels.
    Large,
}

impl ModelClass {
    /// Approximate parameter count, in billions, used for memory
    /// estimation.
    #[must_use]
    pub fn parameter_billions(self) -> f64 {
        match self {
            Self::Small => 3.0,
            Self::Medium => 8.0,
            Self::Large => 34.0,
        }
    }

    /// Recommended minimum VRAM, in bytes, at full precision.
    #[must_use]
    pub fn recommended_vram(self) -> u64 {
        let bytes_per_param = 2u64; // fp16
        (self.parameter_billions() * 1_000_000_000.0) as u64 * bytes_per_param
    }

    /// Whether this class is worth dispatching to accelerator-specific
    /// kernels rather than a generic backend.
    #[must_use]
    pub fn is_accelerator_optimized(self) -> bool {
        matches!(self, Self::Medium | Self::Large)
    }
}

/// Where an inference request was routed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum RouterDecision {
    /// Run on-device using the given model class.
    Local {
        /// The selected local model class.
        model_class: ModelClass,
    },
    /// Run in the cloud against the given provider and concrete model.
    Cloud {
        /// The selected cloud provider.
        provider: CloudProvider,
        /// The concrete model string sent to the provider.
        model: String,
    },
}

impl RouterDecision {
    /// Whether this decision keeps the request on-device.
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local { .. })
    }

    /// The model identifier this decision targets, for logging and audit.
    #[must_use]
    pub fn target_model(&self) -> String {
        match self {
            Self::Local { model_class } => format!("local:{model_class:?}"),
            Self::Cloud { provider, model } => format!("{provider:?}:{model}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_class_ordering_matches_capability() {
        assert!(ModelClass::Small < ModelClass::Medium);
        assert!(ModelClass::Medium < ModelClass::Large);
    }

    #[test]
    fn recommended_vram_grows_with_class() {
        assert!(ModelClass::Small.recommended_vram() < ModelClass::Medium.recommended_vram());
        assert!(ModelClass::Medium.recommended_vram() < ModelClass::Large.recommended_vram());
    }

    #[test]
    fn local_decision_reports_local() {
        let decision = RouterDecision::Local {
            model_class: ModelClass::Small,
        };
        assert!(decision.is_local());
    }

    #[test]
    fn cloud_decision_reports_not_local() {
        let decision = RouterDecision::Cloud {
            provider: CloudProvider::Anthropic,
            model: "claude-sonnet-4-5".to_string(),
        };
        assert!(!decision.is_local());
        assert_eq!(decision.target_model(), "Anthropic:claude-sonnet-4-5");
    }
}
