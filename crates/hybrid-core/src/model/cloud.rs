//! Cloud provider and tier identifiers.

use serde::{Deserialize, Serialize};

/// A cloud inference provider. A closed set: every router decision that
/// targets the cloud names exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloudProvider {
    /// Anthropic's hosted Claude models.
    Anthropic,
    /// OpenAI and OpenAI-compatible endpoints.
    OpenAi,
    /// Google's hosted Gemini models.
    Google,
    /// The organization's own private cloud deployment, used under
    /// safe-mode and for privacy-sensitive traffic.
    PrivateCloud,
}

impl CloudProvider {
    /// Whether this provider is the mandatory safe-mode destination.
    #[must_use]
    pub fn is_private(self) -> bool {
        matches!(self, Self::PrivateCloud)
    }
}

/// A cost/capability tier within a provider. Every `(provider, tier)` pair
/// maps to exactly one model string via [`CloudModelTier::model_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloudModelTier {
    /// Cheapest, lowest latency.
    Mini,
    /// Balanced default.
    Normal,
    /// Highest capability, highest latency and cost.
    Premium,
}

impl CloudModelTier {
    /// The concrete model string a provider exposes for this tier.
    ///
    /// `latency_tier(mini) < latency_tier(normal) <= latency_tier(premium)`
    /// holds for every provider because [`CloudModelTier`]'s declaration
    /// order is the latency order and this table never reorders within a
    /// provider.
    #[must_use]
    pub fn model_for(self, provider: CloudProvider) -> &'static str {
        match (provider, self) {
            (CloudProvider::Anthropic, Self::Mini) => "claude-3-5-haiku-latest",
            (CloudProvider::Anthropic, Self::Normal) => "claude-sonnet-4-5",
            (CloudProvider::Anthropic, Self::Premium) => "claude-opus-4-1",
            (CloudProvider::OpenAi, Self::Mini) => "gpt-4o-mini",
            (CloudProvider::OpenAi, Self::Normal) => "gpt-4o",
            (CloudProvider::OpenAi, Self::Premium) => "o1",
            (CloudProvider::Google, Self::Mini) => "gemini-1.5-flash",
            (CloudProvider::Google, Self::Normal) => "gemini-1.5-pro",
            (CloudProvider::Google, Self::Premium) => "gemini-1.5-pro",
            (CloudProvider::PrivateCloud, Self::Mini) => "private-mini",
            (CloudProvider::PrivateCloud, Self::Normal) => "private-normal",
            (CloudProvider::PrivateCloud, Self::Premium) => "private-premium",
        }
    }

    /// A numeric latency-ordering proxy. Strictly increasing mini -> normal,
    /// non-decreasing normal -> premium (some providers alias normal and
    /// premium to the same underlying model).
    #[must_use]
    pub fn latency_tier(self) -> u8 {
        match self {
            Self::Mini => 0,
            Self::Normal => 1,
            Self::Premium => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_provider_tier_pair_has_a_model() {
        for provider in [
            CloudProvider::Anthropic,
            CloudProvider::OpenAi,
            CloudProvider::Google,
            CloudProvider::PrivateCloud,
        ] {
            for tier in [CloudModelTier::Mini, CloudModelTier::Normal, CloudModelTier::Premium] {
                assert!(!tier.model_for(provider).is_empty());
            }
        }
    }

    #[test]
    fn latency_tier_is_non_decreasing() {
        assert!(CloudModelTier::Mini.latency_tier() < CloudModelTier::Normal.latency_tier());
        assert!(CloudModelTier::Normal.latency_tier() <= CloudModelTier::Premium.latency_tier());
    }

    #[test]
    fn private_cloud_is_the_safe_mode_destination() {
        assert!(CloudProvider::PrivateCloud.is_private());
        assert!(!CloudProvider::Anthropic.is_private());
    }
}
