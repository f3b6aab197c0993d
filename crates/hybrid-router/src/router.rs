//! The shadow router: the two public entry points, `route` and
//! `quick_route`, built on top of the pure gates.

use std::time::Instant;

use hybrid_core::{AuditEventType, AuditSink, Complexity, IntentAnalysis, Prompt, RouterDecision};
use hybrid_cloud::{CloudProviderClient, ProviderConfig};

use crate::analysis::classify_remotely;
use crate::context::RouterContext;
use crate::gates::decide;
use crate::heuristic::heuristic_complexity;

/// Sanitizes a prompt, classifies it, and gates a [`RouterDecision`] on
/// policy, thermal, complexity, and VRAM.
pub struct ShadowRouter<A> {
    audit: A,
}

impl<A: AuditSink> ShadowRouter<A> {
    /// Build a router that emits audit events to `audit`.
    pub fn new(audit: A) -> Self {
        Self { audit }
    }

    /// Full pipeline: sanitize, classify intent via a remote mini-tier call,
    /// then gate on the result. Falls back to the local heuristic (and
    /// never fails the call) if the remote classification can't be
    /// obtained.
    pub async fn route(
        &self,
        prompt: &Prompt,
        ctx: &RouterContext,
        classifier: &dyn CloudProviderClient,
        classifier_config: &ProviderConfig,
    ) -> RouterDecision {
        let started = Instant::now();
        let sanitized = hybrid_sanitizer::sanitize(prompt.as_str());
        self.log_sanitization(&sanitized).await;

        let analysis = match classify_remotely(classifier, classifier_config, &sanitized.sanitized_text).await {
            Some(analysis) => analysis,
            None => IntentAnalysis::heuristic_fallback(heuristic_complexity(prompt)),
        };

        if !analysis.safety_flags.is_empty() {
            self.log(
                AuditEventType::ShadowRouterDecision,
                "shadow_router",
                &format!("sanitization triggered: safety_flags={:?}", analysis.safety_flags),
            )
            .await;
        }

        let decision = decide(ctx, analysis.complexity);
        self.log_decision(&decision, analysis.complexity, analysis.intent, started).await;
        decision
    }

    /// Fast path: sanitize, classify complexity with the local heuristic
    /// only, then gate. Used when no cloud credential is available or the
    /// caller opts out of remote classification.
    pub async fn quick_route(&self, prompt: &Prompt, ctx: &RouterContext) -> RouterDecision {
        let started = Instant::now();
        let sanitized = hybrid_sanitizer::sanitize(prompt.as_str());
        self.log_sanitization(&sanitized).await;

        let complexity = heuristic_complexity(prompt);
        let decision = decide(ctx, complexity);
        self.log_decision(&decision, complexity, hybrid_core::Intent::Undefined, started)
            .await;
        decision
    }

    async fn log_sanitization(&self, sanitized: &hybrid_core::SanitizationResult) {
        if sanitized.was_sanitized {
            self.log(
                AuditEventType::PiiRedaction,
                "shadow_router",
                &format!("redacted {} pattern(s)", sanitized.violations.len()),
            )
            .await;
        } else {
            self.log(AuditEventType::SanitizationPassed, "shadow_router", "no PII detected")
                .await;
        }
    }

    async fn log_decision(
        &self,
        decision: &RouterDecision,
        complexity: Complexity,
        intent: hybrid_core::Intent,
        started: Instant,
    ) {
        let elapsed_ms = started.elapsed().as_millis();
        self.log(
            AuditEventType::ShadowRouterDecision,
            "shadow_router",
            &format!(
                "decision_location={} target_model={} complexity={complexity:?} intent={intent:?} elapsed_ms={elapsed_ms}",
                if decision.is_local() { "local" } else { "cloud" },
                decision.target_model(),
            ),
        )
        .await;
    }

    async fn log(&self, event_type: AuditEventType, source: &str, details: &str) {
        if let Err(err) = self.audit.log(event_type, source, details).await {
            tracing::warn!(%err, "failed to record audit event");
        }
    }
}
