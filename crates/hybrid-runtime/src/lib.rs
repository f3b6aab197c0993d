//! Hybrid Runtime - the orchestration layer tying the router, local engine,
//! cloud client, and resource sentinel together behind a single
//! `HybridExecutionManager` entry point, wrapped in an SLA envelope.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

mod cancellation;
mod clients;
mod config;
mod delegate;
mod error;
mod manager;
mod phase;
mod sla;

pub use cancellation::{CancellationToken, ExecutionCancellationScheduler};
pub use clients::CloudClients;
pub use config::HybridConfig;
pub use delegate::{DelegateRegistry, ExecutionDelegate};
pub use error::{RuntimeError, RuntimeResult};
pub use manager::{ContextProvider, HybridExecutionManager};
pub use phase::{milestones, PipelinePhase, Progress};
pub use sla::{input_fingerprint, output_fingerprint, DeterminismLedger, SlaEnvelope};
