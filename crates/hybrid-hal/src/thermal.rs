//! Thermal probing with a sticky-critical latch.

use std::sync::atomic::{AtomicBool, Ordering};

use hybrid_core::ThermalState;
use sysinfo::Components;

/// A source of raw thermal readings.
pub trait ThermalProbe: Send + Sync {
    /// The current position on the thermal ladder.
    fn observe(&self) -> ThermalState;
}

/// Reads CPU package temperature via `sysinfo`'s component list and maps it
/// onto the thermal ladder. Falls back to `Nominal` if no component exposes
/// a temperature (for example inside a container without sensor access),
/// matching the "no signal means no action" failure posture used
/// throughout this layer.
pub struct SystemThermalProbe {
    components: std::sync::Mutex<Components>,
}

impl SystemThermalProbe {
    /// Build a probe and take an initial sensor reading.
    #[must_use]
    pub fn new() -> Self {
        Self {
            components: std::sync::Mutex::new(Components::new_with_refreshed_list()),
        }
    }

    fn peak_celsius(&self) -> Option<f32> {
        let mut components = self.components.lock().expect("thermal probe mutex poisoned");
        components.refresh(true);
        components
            .iter()
            .filter_map(sysinfo::Component::temperature)
            .fold(None, |max, reading| match max {
                Some(m) if m >= reading => Some(m),
                _ => Some(reading),
            })
    }
}

impl Default for SystemThermalProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ThermalProbe for SystemThermalProbe {
    fn observe(&self) -> ThermalState {
        match self.peak_celsius() {
            Some(c) if c >= 95.0 => ThermalState::Critical,
            Some(c) if c >= 85.0 => ThermalState::Serious,
            Some(c) if c >= 75.0 => ThermalState::Fair,
            Some(_) => ThermalState::Nominal,
            None => ThermalState::Nominal,
        }
    }
}

/// A fixed-reading probe for tests and deployments without sensor access.
#[derive(Debug, Clone, Copy)]
pub struct FixedThermalProbe(pub ThermalState);

impl ThermalProbe for FixedThermalProbe {
    fn observe(&self) -> ThermalState {
        self.0
    }
}

/// Wraps a [`ThermalProbe`] with the sticky-critical latch: `critical` is
/// propagated for exactly one emission after it stops being observed, so a
/// single reading that dips back to `serious` the instant after a critical
/// spike does not silently clear an emergency a caller may still be acting
/// on.
pub struct ThermalMonitor<P> {
    probe: P,
    emergency_latched: AtomicBool,
}

impl<P: ThermalProbe> ThermalMonitor<P> {
    /// Wrap a probe with latch tracking.
    #[must_use]
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            emergency_latched: AtomicBool::new(false),
        }
    }

    /// Take a reading, applying the sticky-critical rule.
    pub fn current_status(&self) -> ThermalState {
        let observed = self.probe.observe();
        if observed == ThermalState::Critical {
            self.emergency_latched.store(true, Ordering::SeqCst);
            return ThermalState::Critical;
        }
        if self.emergency_latched.swap(false, Ordering::SeqCst) {
            return ThermalState::Critical;
        }
        observed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ScriptedProbe {
        readings: std::sync::Mutex<std::collections::VecDeque<ThermalState>>,
    }

    impl ScriptedProbe {
        fn new(readings: Vec<ThermalState>) -> Self {
            Self {
                readings: std::sync::Mutex::new(readings.into()),
            }
        }
    }

    impl ThermalProbe for ScriptedProbe {
        fn observe(&self) -> ThermalState {
            self.readings
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(ThermalState::Nominal)
        }
    }

    #[test]
    fn critical_is_latched_for_exactly_one_emission_after_clearing() {
        let probe = ScriptedProbe::new(vec![
            ThermalState::Nominal,
            ThermalState::Critical,
            ThermalState::Fair,
            ThermalState::Fair,
        ]);
        let monitor = ThermalMonitor::new(probe);

        assert_eq!(monitor.current_status(), ThermalState::Nominal);
        assert_eq!(monitor.current_status(), ThermalState::Critical);
        // First reading after the spike still reports critical (latched).
        assert_eq!(monitor.current_status(), ThermalState::Critical);
        // Second reading after the spike clears the latch.
        assert_eq!(monitor.current_status(), ThermalState::Fair);
    }

    #[test]
    fn repeated_critical_readings_stay_critical() {
        let probe = ScriptedProbe::new(vec![ThermalState::Critical, ThermalState::Critical]);
        let monitor = ThermalMonitor::new(probe);
        assert_eq!(monitor.current_status(), ThermalState::Critical);
        assert_eq!(monitor.current_status(), ThermalState::Critical);
    }
}
