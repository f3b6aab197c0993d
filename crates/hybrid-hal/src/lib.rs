//! Hybrid HAL - polled hardware probes for VRAM and thermal state, and the
//! model-memory estimation that sits on top of them.
//!
//! Nothing here is a daemon: every call is a synchronous poll of current
//! state. Callers that need periodic sampling (the resource sentinel) own
//! their own ticking.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod memory;
pub mod thermal;
pub mod vram;

pub use memory::{estimate_model_memory, recommend_batch_size, recommend_model_class};
pub use thermal::{FixedThermalProbe, SystemThermalProbe, ThermalMonitor, ThermalProbe};
pub use vram::{FixedCeilingProbe, NoAcceleratorProbe, VramProbe};

use hybrid_core::{ModelClass, ThermalState, VRAMStatus};

/// Combines a VRAM probe and a latched thermal monitor into the single
/// handle the rest of the system polls for hardware state.
pub struct HardwareMonitor<V, T> {
    vram: V,
    thermal: ThermalMonitor<T>,
}

impl<V: VramProbe, T: ThermalProbe> HardwareMonitor<V, T> {
    /// Build a monitor from a VRAM probe and a thermal probe.
    pub fn new(vram: V, thermal: T) -> Self {
        Self {
            vram,
            thermal: ThermalMonitor::new(thermal),
        }
    }

    /// Poll the current VRAM status.
    #[must_use]
    pub fn current_vram_status(&self) -> VRAMStatus {
        self.vram.status()
    }

    /// Poll the current thermal status, applying the sticky-critical
    /// latch.
    #[must_use]
    pub fn current_thermal_status(&self) -> ThermalState {
        self.thermal.current_status()
    }

    /// Recommend a model class for the current VRAM status.
    #[must_use]
    pub fn recommend_model_class(&self) -> ModelClass {
        recommend_model_class(&self.current_vram_status())
    }

    /// Recommend a batch size for the current VRAM status.
    #[must_use]
    pub fn recommend_batch_size(&self) -> usize {
        recommend_batch_size(&self.current_vram_status())
    }
}

/// A monitor built from the default, sensor-backed probes. Reports
/// `available_vram = 0` until a platform-specific accelerator probe is
/// configured in place of [`NoAcceleratorProbe`].
pub type DefaultHardwareMonitor = HardwareMonitor<NoAcceleratorProbe, SystemThermalProbe>;

/// Build the default hardware monitor.
#[must_use]
pub fn default_monitor() -> DefaultHardwareMonitor {
    HardwareMonitor::new(NoAcceleratorProbe, SystemThermalProbe::new())
}
