//! Per-call hybrid configuration and its named presets.

use hybrid_core::{CloudModelTier, GenerationParams};

/// Configuration for a single `execute` call.
#[derive(Debug, Clone)]
pub struct HybridConfig {
    /// Whether to run the router's full pipeline (remote mini-tier
    /// classification) rather than the local heuristic only.
    pub use_intent_analysis: bool,
    /// Force the decision to `Local`, bypassing the gates entirely.
    pub force_local: bool,
    /// Force the decision to `Cloud`, bypassing the gates entirely.
    pub force_cloud: bool,
    /// Which cloud tier to request when the decision lands on `Cloud`.
    pub preferred_cloud_tier: CloudModelTier,
    /// Generation parameters used for local execution.
    pub local_generation_params: GenerationParams,
    /// Generation parameters used for cloud execution.
    pub cloud_generation_params: GenerationParams,
    /// Whether a failed primary route may retry once against the other
    /// engine.
    pub allow_fallback: bool,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self::default_preset()
    }
}

impl HybridConfig {
    /// `{analysis: on, fallback: on}` — the all-around default.
    #[must_use]
    pub fn default_preset() -> Self {
        Self {
            use_intent_analysis: true,
            force_local: false,
            force_cloud: false,
            preferred_cloud_tier: CloudModelTier::Normal,
            local_generation_params: GenerationParams::balanced(),
            cloud_generation_params: GenerationParams::balanced(),
            allow_fallback: true,
        }
    }

    /// `{analysis: off}` — skips the remote classification round trip.
    #[must_use]
    pub fn fast() -> Self {
        Self {
            use_intent_analysis: false,
            ..Self::default_preset()
        }
    }

    /// `{force_local: true, fallback: off}` — never leaves the device.
    #[must_use]
    pub fn privacy() -> Self {
        Self {
            use_intent_analysis: false,
            force_local: true,
            allow_fallback: false,
            ..Self::default_preset()
        }
    }

    /// `{force_cloud: true}` — always uses the most capable cloud tier.
    #[must_use]
    pub fn performance() -> Self {
        Self {
            force_cloud: true,
            preferred_cloud_tier: CloudModelTier::Premium,
            cloud_generation_params: GenerationParams::creative(),
            ..Self::default_preset()
        }
    }
}
