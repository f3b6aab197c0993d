//! VRAM accounting and quantization recommendation.

use serde::{Deserialize, Serialize};

const GIB: u64 = 1 << 30;

/// Weight-quantization recommendation, a monotonic step function of
/// available VRAM: `>=24GiB -> none; 12-24 -> q8; 6-12 -> q4; <6 -> q3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantization {
    /// Full precision weights.
    None,
    /// 8-bit quantization.
    Q8,
    /// 4-bit quantization.
    Q4,
    /// 3-bit quantization.
    Q3,
}

impl Quantization {
    /// Recommend a quantization level for the given available VRAM, in
    /// bytes.
    #[must_use]
    pub fn recommend_for(available_vram: u64) -> Self {
        match available_vram {
            v if v >= 24 * GIB => Self::None,
            v if v >= 12 * GIB => Self::Q8,
            v if v >= 6 * GIB => Self::Q4,
            _ => Self::Q3,
        }
    }

    /// Bits used per weight under this quantization, for memory estimation.
    #[must_use]
    pub fn bits_per_weight(self) -> u32 {
        match self {
            Self::None => 16,
            Self::Q8 => 8,
            Self::Q4 => 4,
            Self::Q3 => 3,
        }
    }
}

/// A polled snapshot of accelerator memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VRAMStatus {
    /// The platform-recommended maximum working set, in bytes.
    pub recommended_max_working_set: u64,
    /// Currently allocated accelerator memory, in bytes, if known.
    pub current_allocated: Option<u64>,
    /// Derived available VRAM, in bytes.
    pub available_vram: u64,
    /// Recommended quantization for the available VRAM.
    pub recommended_quantization: Quantization,
}

impl VRAMStatus {
    /// Compute a status from the platform's recommended working set and the
    /// currently allocated amount.
    ///
    /// `available_vram = max(0, floor(0.75 * recommended_max) -
    /// current_allocated)`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn compute(recommended_max_working_set: u64, current_allocated: Option<u64>) -> Self {
        let three_quarters = (recommended_max_working_set as f64 * 0.75).floor() as u64;
        let allocated = current_allocated.unwrap_or(0);
        let available_vram = three_quarters.saturating_sub(allocated);

        Self {
            recommended_max_working_set,
            current_allocated,
            available_vram,
            recommended_quantization: Quantization::recommend_for(available_vram),
        }
    }

    /// A status reporting no local capability at all: if the probe cannot
    /// query the accelerator, available VRAM is reported as zero.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            recommended_max_working_set: 0,
            current_allocated: None,
            available_vram: 0,
            recommended_quantization: Quantization::Q3,
        }
    }
}
