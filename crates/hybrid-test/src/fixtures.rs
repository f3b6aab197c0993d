//! Fixture builders for common value types, so individual test modules don't
//! each re-derive the same boilerplate context.

use hybrid_core::{CloudProvider, Prompt, SecurityPolicy, ThermalState};
use hybrid_router::RouterContext;

const GIB: u64 = 1 << 30;

/// Build a prompt from a literal, for tests that don't care about
/// validation edge cases.
#[must_use]
pub fn test_prompt(text: &str) -> Prompt {
    Prompt::new(text)
}

/// A router context with ample VRAM, nominal thermal state, balanced
/// policy, and no preferred provider — the common "nothing unusual is
/// happening" baseline.
#[must_use]
pub fn ample_context() -> RouterContext {
    RouterContext {
        policy: SecurityPolicy::balanced(),
        thermal: ThermalState::Nominal,
        available_vram: 32 * GIB,
        preferred_provider: None,
    }
}

/// A router context with too little VRAM for local execution.
#[must_use]
pub fn starved_context() -> RouterContext {
    RouterContext {
        available_vram: 2 * GIB,
        ..ample_context()
    }
}

/// A router context under safe-mode policy.
#[must_use]
pub fn safe_mode_context() -> RouterContext {
    RouterContext {
        policy: SecurityPolicy::safe_mode(),
        ..ample_context()
    }
}

/// A router context at a given thermal state, otherwise the ample
/// baseline.
#[must_use]
pub fn context_with_thermal(thermal: ThermalState) -> RouterContext {
    RouterContext { thermal, ..ample_context() }
}

/// A router context preferring the given provider, otherwise the ample
/// baseline.
#[must_use]
pub fn context_preferring(provider: CloudProvider) -> RouterContext {
    RouterContext {
        preferred_provider: Some(provider),
        ..ample_context()
    }
}
