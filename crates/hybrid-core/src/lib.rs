//! Hybrid Core - shared data model, error taxonomy, and collaborator traits
//! for the hybrid inference execution core.
//!
//! This crate provides:
//! - The value types every component passes around (`Prompt`, `SystemState`,
//!   `SecurityPolicy`, `VRAMStatus`, `RouterDecision`, ...)
//! - The retry policy shared by the cloud client and its callers
//! - Trait interfaces for out-of-scope collaborators (audit log, secret
//!   store, identity signer) that the core consumes but does not own

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod collaborators;
pub mod model;
pub mod retry;

pub use collaborators::{AuditEventType, AuditSink, CollaboratorError, IdentitySigner, SecretStore};
pub use model::{
    BatteryState, CloudModelTier, CloudProvider, Complexity, ExecutionPolicy, GenerationParams,
    HybridExecutionResult, InferenceIntent, Intent, IntentAnalysis, ModelClass, PiiViolation,
    PriorityTier, Prompt, Quantization, RouterDecision, SanitizationResult, SecurityPolicy,
    StreamEvent, SystemState, ThermalState, VRAMStatus,
};
pub use retry::RetryPolicy;
