//! Model memory estimation and class/batch-size recommendation.

use hybrid_core::{ModelClass, Quantization, VRAMStatus};

/// Estimate the memory footprint, in bytes, of a model with the given
/// parameter count under the given quantization.
///
/// `param_billions * 1e9 * bits_per_weight / 8 * 1.2`, where the `1.2`
/// factor accounts for activation and KV-cache overhead.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn estimate_model_memory(param_billions: f64, quant: Quantization) -> u64 {
    let weight_bytes = param_billions * 1_000_000_000.0 * f64::from(quant.bits_per_weight()) / 8.0;
    let with_overhead = weight_bytes * 1.2;
    with_overhead.round() as u64
}

/// Recommend the largest model class that fits comfortably in the given
/// VRAM status at its own recommended quantization.
#[must_use]
pub fn recommend_model_class(status: &VRAMStatus) -> ModelClass {
    let fits = |class: ModelClass| {
        estimate_model_memory(class.parameter_billions(), status.recommended_quantization)
            <= status.available_vram
    };

    if fits(ModelClass::Large) {
        ModelClass::Large
    } else if fits(ModelClass::Medium) {
        ModelClass::Medium
    } else {
        ModelClass::Small
    }
}

/// Recommend a generation batch size given the current VRAM headroom.
/// Conservative by design: local generation latency is dominated by single
/// requests, so batching is only worthwhile with ample headroom.
#[must_use]
pub fn recommend_batch_size(status: &VRAMStatus) -> usize {
    const GIB: u64 = 1 << 30;
    match status.available_vram {
        v if v >= 16 * GIB => 4,
        v if v >= 8 * GIB => 2,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_matches_formula() {
        // 7B params, q8 (8 bits/weight): 7e9 * 8 / 8 * 1.2 = 8.4e9 bytes.
        let bytes = estimate_model_memory(7.0, Quantization::Q8);
        assert_eq!(bytes, 8_400_000_000);
    }

    #[test]
    fn full_precision_costs_twice_q8() {
        let fp = estimate_model_memory(7.0, Quantization::None);
        let q8 = estimate_model_memory(7.0, Quantization::Q8);
        assert_eq!(fp, q8 * 2);
    }

    #[test]
    fn recommend_model_class_picks_largest_fitting_class() {
        let plenty = VRAMStatus::compute(64 * (1 << 30), Some(0));
        assert_eq!(recommend_model_class(&plenty), ModelClass::Large);

        let scarce = VRAMStatus::compute(4 * (1 << 30), Some(0));
        assert_eq!(recommend_model_class(&scarce), ModelClass::Small);
    }

    #[test]
    fn recommend_batch_size_scales_with_headroom() {
        let plenty = VRAMStatus::compute(64 * (1 << 30), Some(0));
        assert_eq!(recommend_batch_size(&plenty), 4);

        let none = VRAMStatus::unavailable();
        assert_eq!(recommend_batch_size(&none), 1);
    }
}
