//! The pure gating function: policy, thermal, complexity, and VRAM in, a
//! [`RouterDecision`] out. No I/O, no async, fully deterministic.

use hybrid_core::{CloudModelTier, Complexity, ExecutionPolicy, ModelClass, RouterDecision, ThermalState};

use crate::context::RouterContext;

const GIB: u64 = 1 << 30;

/// Pick a local model class for the given available VRAM.
///
/// Step function over four bands (`>=16`, `10-16`, `6-10`, `<6` GiB), folded
/// onto the three [`ModelClass`] variants: the top band maps to `Large`, the
/// middle two both map to `Medium` (a 10 GiB accelerator and a 6 GiB one are
/// both "medium" in load-bearing capability even though the platform-level
/// quantization recommendation still distinguishes them), and the bottom
/// band maps to `Small`.
#[must_use]
pub fn select_local_model(available_vram: u64) -> ModelClass {
    match available_vram {
        v if v >= 16 * GIB => ModelClass::Large,
        v if v >= 6 * GIB => ModelClass::Medium,
        _ => ModelClass::Small,
    }
}

/// Evaluate the gates in order and return the first one that fires.
#[must_use]
pub fn decide(ctx: &RouterContext, complexity: Complexity) -> RouterDecision {
    // Gate 1: safe-mode override.
    if ctx.policy.execution_policy == ExecutionPolicy::SafeMode {
        return cloud_decision(hybrid_core::CloudProvider::PrivateCloud, CloudModelTier::Normal);
    }

    // Gate 2: thermal override.
    if ctx.thermal == ThermalState::Critical {
        return cloud_decision(ctx.preferred_or_default(), CloudModelTier::Normal);
    }

    // Gate 3: low-complexity, high-VRAM shortcut.
    if complexity == Complexity::Low && ctx.available_vram > 16 * GIB && ctx.thermal.allows_intensive_compute() {
        return RouterDecision::Local {
            model_class: select_local_model(ctx.available_vram),
        };
    }

    // Gate 4: high-complexity or low-VRAM push to cloud.
    if complexity == Complexity::High || ctx.available_vram < 8 * GIB {
        return cloud_decision(ctx.preferred_or_default(), CloudModelTier::Normal);
    }

    // Gate 5: default.
    if ctx.available_vram > 8 * GIB && ctx.thermal != ThermalState::Serious {
        RouterDecision::Local {
            model_class: select_local_model(ctx.available_vram),
        }
    } else {
        cloud_decision(ctx.preferred_or_default(), CloudModelTier::Normal)
    }
}

fn cloud_decision(provider: hybrid_core::CloudProvider, tier: CloudModelTier) -> RouterDecision {
    RouterDecision::Cloud {
        provider,
        model: tier.model_for(provider).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use hybrid_core::{CloudProvider, SecurityPolicy};

    use super::*;

    fn ctx(thermal: ThermalState, available_vram: u64) -> RouterContext {
        RouterContext {
            policy: SecurityPolicy::balanced(),
            thermal,
            available_vram,
            preferred_provider: None,
        }
    }

    #[test]
    fn select_local_model_steps_at_the_documented_bands() {
        assert_eq!(select_local_model(20 * GIB), ModelClass::Large);
        assert_eq!(select_local_model(16 * GIB), ModelClass::Large);
        assert_eq!(select_local_model(12 * GIB), ModelClass::Medium);
        assert_eq!(select_local_model(6 * GIB), ModelClass::Medium);
        assert_eq!(select_local_model(4 * GIB), ModelClass::Small);
    }

    #[test]
    fn safe_mode_overrides_everything() {
        let mut context = ctx(ThermalState::Nominal, 64 * GIB);
        context.policy = SecurityPolicy::safe_mode();
        let decision = decide(&context, Complexity::Low);
        assert_eq!(
            decision,
            RouterDecision::Cloud {
                provider: CloudProvider::PrivateCloud,
                model: CloudModelTier::Normal.model_for(CloudProvider::PrivateCloud).to_string(),
            }
        );
    }

    #[test]
    fn critical_thermal_forces_cloud_even_with_ample_vram() {
        let context = ctx(ThermalState::Critical, 64 * GIB);
        let decision = decide(&context, Complexity::Low);
        assert!(!decision.is_local());
    }

    #[test]
    fn critical_thermal_falls_back_to_anthropic_with_no_preference() {
        let context = ctx(ThermalState::Critical, 64 * GIB);
        let decision = decide(&context, Complexity::Low);
        assert_eq!(
            decision,
            RouterDecision::Cloud {
                provider: CloudProvider::Anthropic,
                model: CloudModelTier::Normal.model_for(CloudProvider::Anthropic).to_string(),
            }
        );
    }

    #[test]
    fn low_complexity_high_vram_shortcut_stays_local() {
        let context = ctx(ThermalState::Nominal, 20 * GIB);
        let decision = decide(&context, Complexity::Low);
        assert_eq!(decision, RouterDecision::Local { model_class: ModelClass::Large });
    }

    #[test]
    fn high_complexity_pushes_to_cloud_regardless_of_vram() {
        let context = ctx(ThermalState::Nominal, 64 * GIB);
        let decision = decide(&context, Complexity::High);
        assert!(!decision.is_local());
    }

    #[test]
    fn low_vram_pushes_to_cloud_regardless_of_complexity() {
        let context = ctx(ThermalState::Nominal, 2 * GIB);
        let decision = decide(&context, Complexity::Low);
        assert!(!decision.is_local());
    }

    #[test]
    fn default_gate_keeps_mid_range_vram_local_when_not_serious() {
        let context = ctx(ThermalState::Fair, 10 * GIB);
        let decision = decide(&context, Complexity::Low);
        assert_eq!(decision, RouterDecision::Local { model_class: ModelClass::Medium });
    }

    #[test]
    fn default_gate_sends_serious_thermal_to_cloud() {
        let context = ctx(ThermalState::Serious, 10 * GIB);
        let decision = decide(&context, Complexity::Low);
        assert!(!decision.is_local());
    }
}
