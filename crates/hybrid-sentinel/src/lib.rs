//! Hybrid Sentinel - converts external OS and hardware signals into
//! preemption of in-flight inference via four cancellable, restart-safe
//! observers. The sentinel never fails a call: every effect is a
//! best-effort delegate notification or scheduler submission.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

mod delegate;
mod heavy_app;
mod idle_unload;
mod memory_pressure;
mod observer;
mod scheduler;
mod thermal_watcher;

pub use delegate::{NullDelegate, ResourceDelegate};
pub use heavy_app::{HeavyAppSentinel, LaunchEvents};
pub use idle_unload::{IdleUnloadSentinel, DEFAULT_IDLE_TIMEOUT};
pub use memory_pressure::{MemoryPressureEvents, MemoryPressureLevel, MemoryPressureObserver};
pub use scheduler::{RecordingScheduler, SchedulerTask, TaskScheduler};
pub use thermal_watcher::{ThermalEvents, ThermalWatcher};
