//! System state: RAM, thermal ladder, battery, CPU.

use serde::{Deserialize, Serialize};

/// Thermal ladder, totally ordered from coolest to hottest.
///
/// Declaration order is the ladder order, so `Nominal < Fair < Serious <
/// Critical` falls out of the derived [`Ord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThermalState {
    /// Normal operating temperature.
    Nominal,
    /// Slightly elevated; no action required.
    Fair,
    /// Elevated; heavy local compute should be avoided.
    Serious,
    /// Critical; local compute must stop and cloud is forced.
    Critical,
}

impl ThermalState {
    /// Whether this state allows intensive local compute: true iff
    /// `{Nominal, Fair}`.
    #[must_use]
    pub fn allows_intensive_compute(self) -> bool {
        matches!(self, Self::Nominal | Self::Fair)
    }

    /// Whether this state alone forces a cloud offload: true iff `Critical`;
    /// `Serious` forbids heavy local but does not by itself force cloud.
    #[must_use]
    pub fn requires_cloud_offload(self) -> bool {
        matches!(self, Self::Critical)
    }
}

/// Battery charge state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatteryState {
    /// No battery, or state unknown (e.g. desktop).
    Unknown,
    /// On battery power.
    Unplugged,
    /// Plugged in and charging.
    Charging,
    /// Plugged in, fully charged.
    Full,
}

/// A polled snapshot of hardware and OS state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemState {
    /// Available RAM in bytes.
    pub ram_available: u64,
    /// Total RAM in bytes.
    pub ram_total: u64,
    /// Thermal ladder position.
    pub thermal: ThermalState,
    /// Battery charge state.
    pub battery_state: BatteryState,
    /// Battery level in `[0, 1]`, if known.
    pub battery_level: Option<f32>,
    /// CPU utilization in `[0, 1]`.
    pub cpu_utilization: f32,
}

impl SystemState {
    /// Whether this snapshot satisfies the `ram_available <= ram_total`
    /// invariant.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.ram_available <= self.ram_total
    }
}
