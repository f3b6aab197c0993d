//! The pipeline phases a call passes through, observable to delegates as
//! progress events.

/// A stage of the `sanitize -> route -> execute -> observe` pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePhase {
    /// No call in flight.
    Idle,
    /// Redacting PII from the prompt.
    Sanitizing,
    /// Running (or about to run) remote intent classification.
    AnalyzingIntent,
    /// Evaluating the routing gates.
    Routing,
    /// Loading a local model to satisfy the routed decision.
    LoadingModel,
    /// Generating text, locally or in the cloud.
    Generating,
    /// The call finished successfully.
    Completed,
    /// The call finished with an error.
    Failed,
}

/// A progress event delivered to every registered delegate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// The phase this event was emitted from.
    pub phase: PipelinePhase,
    /// Coarse completion fraction in `[0, 1]`.
    pub percent_complete: f32,
}

impl Progress {
    /// Build a progress event.
    #[must_use]
    pub fn new(phase: PipelinePhase, percent_complete: f32) -> Self {
        Self { phase, percent_complete }
    }
}

/// The milestone constants named by the pipeline-phase progress schedule.
pub mod milestones {
    /// Sanitization starting.
    pub const SANITIZE_START: f32 = 0.1;
    /// Sanitization finished.
    pub const SANITIZE_DONE: f32 = 0.2;
    /// Routing starting.
    pub const ROUTING_START: f32 = 0.3;
    /// Remote intent analysis in flight.
    pub const ANALYSIS: f32 = 0.35;
    /// Routing decision reached.
    pub const ROUTING_DONE: f32 = 0.4;
    /// Model loading or generation in progress.
    pub const GENERATING: f32 = 0.5;
    /// Generation nearing completion.
    pub const GENERATING_LATE: f32 = 0.6;
    /// The call is fully complete.
    pub const COMPLETED: f32 = 1.0;
}
