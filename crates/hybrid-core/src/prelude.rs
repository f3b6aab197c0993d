//! Convenience re-exports for downstream crates.

pub use crate::collaborators::{AuditEventType, AuditSink, CollaboratorError, IdentitySigner, SecretStore};
pub use crate::model::{
    BatteryState, CloudModelTier, CloudProvider, Complexity, ExecutionPolicy, GenerationParams,
    HybridExecutionResult, InferenceIntent, Intent, IntentAnalysis, ModelClass, PiiViolation,
    PriorityTier, Prompt, Quantization, RouterDecision, SanitizationResult, SecurityPolicy,
    StreamEvent, SystemState, ThermalState, VRAMStatus,
};
pub use crate::retry::RetryPolicy;
