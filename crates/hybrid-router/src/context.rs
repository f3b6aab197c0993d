//! Inputs the router gates on, collected once per call from the hardware
//! monitor and the active policy.

use hybrid_core::{CloudProvider, SecurityPolicy, ThermalState};

/// A snapshot of everything the gates need besides the prompt itself.
#[derive(Debug, Clone, Copy)]
pub struct RouterContext {
    /// The active security policy.
    pub policy: SecurityPolicy,
    /// Current thermal ladder position.
    pub thermal: ThermalState,
    /// Currently available accelerator memory, in bytes.
    pub available_vram: u64,
    /// The provider to prefer when a gate sends work to the cloud, absent a
    /// more specific reason to pick another one.
    pub preferred_provider: Option<CloudProvider>,
}

impl RouterContext {
    /// The provider a cloud-bound gate should target: the configured
    /// preference, or `anthropic` if none is set.
    #[must_use]
    pub fn preferred_or_default(&self) -> CloudProvider {
        self.preferred_provider.unwrap_or(CloudProvider::Anthropic)
    }
}
