//! The hybrid execution manager: the single orchestration entry point.
//! Wraps `sanitize -> route -> execute -> observe` in the SLA envelope,
//! maps every internal error through [`RuntimeError`], and reports
//! progress to every registered delegate.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use hybrid_cloud::{generate_with_retry, CircuitBreakerRegistry, Message, ProviderConfig};
use hybrid_core::{
    CloudModelTier, HybridExecutionResult, ModelClass, Prompt, Quantization, RetryPolicy, RouterDecision,
};
use hybrid_hal::VramProbe;
use hybrid_local::{InferenceBackend, LocalEngineFacade};
use hybrid_router::{select_local_model, RouterContext, ShadowRouter};
use uuid::Uuid;

use crate::cancellation::CancellationToken;
use crate::clients::CloudClients;
use crate::config::HybridConfig;
use crate::delegate::{DelegateRegistry, ExecutionDelegate};
use crate::error::{RuntimeError, RuntimeResult};
use crate::phase::{milestones, PipelinePhase, Progress};
use crate::sla::{input_fingerprint, output_fingerprint, DeterminismLedger, SlaEnvelope};

/// A function producing a fresh [`RouterContext`] for each call, typically
/// backed by a [`hybrid_hal::HardwareMonitor`] and the currently active
/// [`hybrid_core::SecurityPolicy`].
pub type ContextProvider = Arc<dyn Fn() -> RouterContext + Send + Sync>;

/// Single orchestration entry for hybrid (local/cloud) inference.
pub struct HybridExecutionManager<V, B, A> {
    local: Arc<LocalEngineFacade<V, B>>,
    router: Arc<ShadowRouter<A>>,
    cloud: CloudClients,
    breakers: Arc<CircuitBreakerRegistry>,
    retry_policy: RetryPolicy,
    context_provider: ContextProvider,
    delegates: DelegateRegistry,
    sla: SlaEnvelope,
    determinism: DeterminismLedger,
    cancellation: CancellationToken,
}

impl<V, B, A> HybridExecutionManager<V, B, A>
where
    V: VramProbe + 'static,
    B: InferenceBackend + Clone + 'static,
    A: hybrid_core::AuditSink + 'static,
{
    /// Build a manager from its collaborators, with a dedicated circuit
    /// breaker registry (`failure_threshold = 3`, `cooldown = 60s`).
    pub fn new(
        local: Arc<LocalEngineFacade<V, B>>,
        router: Arc<ShadowRouter<A>>,
        cloud: CloudClients,
        retry_policy: RetryPolicy,
        context_provider: ContextProvider,
        sla: SlaEnvelope,
    ) -> Self {
        Self::with_breaker_registry(
            local,
            router,
            cloud,
            Arc::new(CircuitBreakerRegistry::new()),
            retry_policy,
            context_provider,
            sla,
        )
    }

    /// Build a manager sharing the given circuit breaker registry, for
    /// deployments running several managers against the same upstream
    /// hosts, or tests that need a registry with a short cooldown.
    pub fn with_breaker_registry(
        local: Arc<LocalEngineFacade<V, B>>,
        router: Arc<ShadowRouter<A>>,
        cloud: CloudClients,
        breakers: Arc<CircuitBreakerRegistry>,
        retry_policy: RetryPolicy,
        context_provider: ContextProvider,
        sla: SlaEnvelope,
    ) -> Self {
        Self {
            local,
            router,
            cloud,
            breakers,
            retry_policy,
            context_provider,
            delegates: DelegateRegistry::new(),
            sla,
            determinism: DeterminismLedger::new(),
            cancellation: CancellationToken::new(),
        }
    }

    /// A clone of the manager's cancellation token, for wiring into an
    /// [`crate::ExecutionCancellationScheduler`] registered with a
    /// sentinel observer.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Full pipeline under the SLA envelope's timeout, preemptible by a
    /// critical-tier scheduler submission via [`Self::cancellation_token`].
    pub async fn execute(&self, prompt: Prompt, config: HybridConfig) -> RuntimeResult<HybridExecutionResult> {
        let total_started = Instant::now();
        tokio::select! {
            _ = self.cancellation.cancelled() => {
                self.delegates.broadcast_failure("cancellation requested").await;
                Err(RuntimeError::CancellationRequested)
            }
            outcome = tokio::time::timeout(self.sla.timeout(), self.execute_inner(&prompt, &config, total_started)) => {
                match outcome {
                    Ok(inner) => inner,
                    Err(_elapsed) => {
                        self.delegates.broadcast_failure("timeout exceeded").await;
                        Err(RuntimeError::TimeoutExceeded(self.sla.timeout_seconds))
                    }
                }
            }
        }
    }

    /// Run `execute`; on failure, retry once against the other engine
    /// (local -> cloud, or cloud -> local if locally capable), with
    /// analysis and fallback disabled on the retry. Disabled entirely when
    /// `config.allow_fallback` is false.
    pub async fn execute_with_fallback(&self, prompt: Prompt, config: HybridConfig) -> RuntimeResult<HybridExecutionResult> {
        let allow_fallback = config.allow_fallback;
        match self.execute(prompt.clone(), config.clone()).await {
            Ok(result) => Ok(result),
            Err(primary_err) if allow_fallback => {
                let tried_local_first = config.force_local;
                let fallback_config = if tried_local_first {
                    HybridConfig {
                        force_local: false,
                        force_cloud: true,
                        use_intent_analysis: false,
                        allow_fallback: false,
                        ..config
                    }
                } else if self.can_execute_locally().await {
                    HybridConfig {
                        force_local: true,
                        force_cloud: false,
                        use_intent_analysis: false,
                        allow_fallback: false,
                        ..config
                    }
                } else {
                    return Err(primary_err);
                };

                self.execute(prompt, fallback_config).await.map_err(|fallback_err| {
                    if tried_local_first {
                        RuntimeError::BothEnginesFailed {
                            local: primary_err.to_string(),
                            cloud: fallback_err.to_string(),
                        }
                    } else {
                        RuntimeError::BothEnginesFailed {
                            local: fallback_err.to_string(),
                            cloud: primary_err.to_string(),
                        }
                    }
                })
            }
            Err(err) => Err(err),
        }
    }

    /// `execute` with [`HybridConfig::fast`].
    pub async fn quick_execute(&self, prompt: Prompt) -> RuntimeResult<HybridExecutionResult> {
        self.execute(prompt, HybridConfig::fast()).await
    }

    /// `execute` with [`HybridConfig::privacy`].
    pub async fn privacy_execute(&self, prompt: Prompt) -> RuntimeResult<HybridExecutionResult> {
        self.execute(prompt, HybridConfig::privacy()).await
    }

    /// `execute` with [`HybridConfig::performance`].
    pub async fn performance_execute(&self, prompt: Prompt) -> RuntimeResult<HybridExecutionResult> {
        self.execute(prompt, HybridConfig::performance()).await
    }

    /// Load a local model ahead of a call, sized to the currently
    /// available VRAM.
    pub async fn preload_model(&self, directory: std::path::PathBuf, model_class: ModelClass) -> RuntimeResult<()> {
        let ctx = (self.context_provider)();
        let quantization = Quantization::recommend_for(ctx.available_vram);
        self.local.load(model_class, directory, quantization).await?;
        Ok(())
    }

    /// Unload the local model, if any.
    pub async fn unload_model(&self) {
        self.local.unload().await;
    }

    /// Whether a local model is currently loaded.
    pub async fn is_model_loaded(&self) -> bool {
        self.local.state().await.is_loaded()
    }

    /// Whether local execution has any usable accelerator headroom right
    /// now.
    pub async fn can_execute_locally(&self) -> bool {
        (self.context_provider)().available_vram > 0
    }

    /// Whether any configured cloud client has a credential installed.
    pub async fn can_execute_in_cloud(&self) -> bool {
        self.cloud.any_has_credential()
    }

    /// Register a delegate, returning its id.
    pub fn add_delegate(&self, delegate: Arc<dyn ExecutionDelegate>) -> Uuid {
        self.delegates.add(delegate)
    }

    /// Remove a previously registered delegate.
    pub fn remove_delegate(&self, id: Uuid) {
        self.delegates.remove(id);
    }

    async fn execute_inner(
        &self,
        prompt: &Prompt,
        config: &HybridConfig,
        total_started: Instant,
    ) -> RuntimeResult<HybridExecutionResult> {
        self.emit(PipelinePhase::Sanitizing, milestones::SANITIZE_START).await;
        let sanitized = hybrid_sanitizer::sanitize(prompt.as_str());
        self.emit(PipelinePhase::Sanitizing, milestones::SANITIZE_DONE).await;

        self.emit(PipelinePhase::Routing, milestones::ROUTING_START).await;
        let routing_started = Instant::now();
        let ctx = (self.context_provider)();
        let decision = self.route(prompt, config, &ctx).await;
        let routing_time = routing_started.elapsed();
        self.emit(PipelinePhase::Routing, milestones::ROUTING_DONE).await;

        self.emit(PipelinePhase::LoadingModel, milestones::GENERATING).await;
        let generation_started = Instant::now();
        let text = self.generate_for_decision(&decision, &sanitized.sanitized_text, config).await;
        let text = match text {
            Ok(text) => text,
            Err(err) => {
                self.emit(PipelinePhase::Failed, milestones::GENERATING_LATE).await;
                self.delegates.broadcast_failure(&err.to_string()).await;
                return Err(err);
            }
        };
        self.emit(PipelinePhase::Generating, milestones::GENERATING_LATE).await;
        let generation_time = generation_started.elapsed();
        let total_time = total_started.elapsed();

        if self.sla.deterministic {
            if let Some(violation) = self.check_determinism(prompt, config, &text) {
                self.delegates.broadcast_failure(&violation.to_string()).await;
                return Err(violation);
            }
        }

        let mut metadata = HashMap::new();
        metadata.insert("sanitized".to_string(), sanitized.was_sanitized.to_string());

        let result = HybridExecutionResult {
            text,
            decision,
            routing_time,
            generation_time,
            total_time,
            pii_redacted: sanitized.was_sanitized,
            metadata,
        };

        self.emit(PipelinePhase::Completed, milestones::COMPLETED).await;
        self.delegates.broadcast_completion(&result).await;
        Ok(result)
    }

    async fn route(&self, prompt: &Prompt, config: &HybridConfig, ctx: &RouterContext) -> RouterDecision {
        if config.force_local {
            return RouterDecision::Local {
                model_class: select_local_model(ctx.available_vram),
            };
        }
        if config.force_cloud {
            let provider = ctx.preferred_or_default();
            return RouterDecision::Cloud {
                provider,
                model: config.preferred_cloud_tier.model_for(provider).to_string(),
            };
        }
        if config.use_intent_analysis {
            self.emit(PipelinePhase::AnalyzingIntent, milestones::ANALYSIS).await;
            let provider = ctx.preferred_or_default();
            let classifier_config = ProviderConfig::new(provider, CloudModelTier::Mini);
            match self.cloud.get(provider) {
                Some(classifier) => self.router.route(prompt, ctx, classifier.as_ref(), &classifier_config).await,
                None => self.router.quick_route(prompt, ctx).await,
            }
        } else {
            self.router.quick_route(prompt, ctx).await
        }
    }

    async fn generate_for_decision(
        &self,
        decision: &RouterDecision,
        sanitized_text: &str,
        config: &HybridConfig,
    ) -> RuntimeResult<String> {
        match decision {
            RouterDecision::Local { model_class } => {
                let state = self.local.state().await;
                match state.model_info() {
                    None => Err(RuntimeError::RoutingFailed("model not loaded".to_string())),
                    Some(info) if info.class != *model_class => {
                        Err(RuntimeError::RoutingFailed("model mismatch".to_string()))
                    }
                    Some(_) => {
                        let generated = self.local.generate(sanitized_text, &config.local_generation_params).await?;
                        Ok(generated.text)
                    }
                }
            }
            RouterDecision::Cloud { provider, .. } => {
                let client = self.cloud.get(*provider).ok_or_else(|| {
                    RuntimeError::RoutingFailed(format!("no cloud client configured for provider {provider:?}"))
                })?;
                let provider_config = ProviderConfig::new(*provider, config.preferred_cloud_tier)
                    .with_max_tokens(config.cloud_generation_params.max_tokens as u32)
                    .with_temperature(config.cloud_generation_params.temperature);
                let messages = vec![Message::user(sanitized_text.to_string())];
                let text =
                    generate_with_retry(client.as_ref(), &messages, &provider_config, &self.retry_policy, &self.breakers)
                        .await?;
                Ok(text)
            }
        }
    }

    fn check_determinism(&self, prompt: &Prompt, config: &HybridConfig, text: &str) -> Option<RuntimeError> {
        let input = input_fingerprint(prompt.as_str(), config.use_intent_analysis, config.force_local, config.force_cloud);
        let previous = self.determinism.record(input, &self.sla.version, text)?;
        let current = output_fingerprint(text);
        if previous == current {
            None
        } else {
            Some(RuntimeError::DeterministicViolation(format!(
                "input produced fingerprint {previous} then {current} within version {}",
                self.sla.version
            )))
        }
    }

    async fn emit(&self, phase: PipelinePhase, percent_complete: f32) {
        self.delegates.broadcast_progress(Progress::new(phase, percent_complete)).await;
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use hybrid_cloud::{CloudProviderClient, CloudResult, Message as CloudMessage, StreamBox};
    use hybrid_core::{CloudProvider, NullAuditSink, SecurityPolicy, ThermalState};
    use hybrid_hal::FixedCeilingProbe;
    use hybrid_local::StubBackend;

    use super::*;

    struct ScriptedCloud {
        reply: String,
    }

    #[async_trait]
    impl CloudProviderClient for ScriptedCloud {
        fn provider(&self) -> CloudProvider {
            CloudProvider::Anthropic
        }

        fn has_credential(&self) -> bool {
            true
        }

        async fn generate(&self, _messages: &[CloudMessage], _config: &ProviderConfig) -> CloudResult<String> {
            Ok(self.reply.clone())
        }

        async fn generate_streaming(&self, _messages: &[CloudMessage], _config: &ProviderConfig) -> CloudResult<StreamBox> {
            unreachable!("manager tests only exercise non-streaming generate")
        }
    }

    fn ample_context() -> ContextProvider {
        Arc::new(|| RouterContext {
            policy: SecurityPolicy::balanced(),
            thermal: ThermalState::Nominal,
            available_vram: 20 * (1 << 30),
            preferred_provider: None,
        })
    }

    fn manager_with_cloud_reply(
        reply: &str,
    ) -> HybridExecutionManager<FixedCeilingProbe, StubBackend, NullAuditSink> {
        let local = Arc::new(LocalEngineFacade::new(FixedCeilingProbe::new(64 * (1 << 30)), StubBackend));
        let router = Arc::new(ShadowRouter::new(NullAuditSink));
        let cloud: Arc<dyn CloudProviderClient> = Arc::new(ScriptedCloud { reply: reply.to_string() });
        let cloud = crate::clients::CloudClients::single(cloud);
        HybridExecutionManager::new(local, router, cloud, RetryPolicy::default(), ample_context(), SlaEnvelope::default())
    }

    #[tokio::test]
    async fn execute_with_force_cloud_returns_the_scripted_reply() {
        let manager = manager_with_cloud_reply("hello from the cloud");
        let config = HybridConfig {
            force_cloud: true,
            ..HybridConfig::fast()
        };
        let result = manager.execute(Prompt::new("hi"), config).await.unwrap();
        assert_eq!(result.text, "hello from the cloud");
        assert!(!result.decision.is_local());
    }

    #[tokio::test]
    async fn local_generation_fails_with_routing_error_when_no_model_loaded() {
        let manager = manager_with_cloud_reply("unused");
        let config = HybridConfig {
            force_local: true,
            allow_fallback: false,
            ..HybridConfig::fast()
        };
        let error = manager.execute(Prompt::new("hi"), config).await.unwrap_err();
        assert!(matches!(error, RuntimeError::RoutingFailed(message) if message == "model not loaded"));
    }

    #[tokio::test]
    async fn fallback_from_failed_local_reaches_the_cloud() {
        let manager = manager_with_cloud_reply("fallback answer");
        let config = HybridConfig {
            force_local: true,
            ..HybridConfig::privacy()
        };
        let config = HybridConfig { allow_fallback: true, ..config };
        let result = manager.execute_with_fallback(Prompt::new("hi"), config).await.unwrap();
        assert_eq!(result.text, "fallback answer");
    }

    struct AlternatingCloud {
        calls: std::sync::atomic::AtomicUsize,
    }

    #[async_trait]
    impl CloudProviderClient for AlternatingCloud {
        fn provider(&self) -> CloudProvider {
            CloudProvider::Anthropic
        }

        fn has_credential(&self) -> bool {
            true
        }

        async fn generate(&self, _messages: &[CloudMessage], _config: &ProviderConfig) -> CloudResult<String> {
            let call = self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(if call == 0 { "first answer".to_string() } else { "second answer".to_string() })
        }

        async fn generate_streaming(&self, _messages: &[CloudMessage], _config: &ProviderConfig) -> CloudResult<StreamBox> {
            unreachable!("manager tests only exercise non-streaming generate")
        }
    }

    #[tokio::test]
    async fn deterministic_sla_rejects_a_changed_output_for_the_same_input() {
        let local = Arc::new(LocalEngineFacade::new(FixedCeilingProbe::new(64 * (1 << 30)), StubBackend));
        let router = Arc::new(ShadowRouter::new(NullAuditSink));
        let cloud: Arc<dyn CloudProviderClient> = Arc::new(AlternatingCloud {
            calls: std::sync::atomic::AtomicUsize::new(0),
        });
        let cloud = crate::clients::CloudClients::single(cloud);
        let sla = SlaEnvelope {
            deterministic: true,
            ..SlaEnvelope::default()
        };
        let manager: HybridExecutionManager<FixedCeilingProbe, StubBackend, NullAuditSink> =
            HybridExecutionManager::new(local, router, cloud, RetryPolicy::default(), ample_context(), sla);
        let config = HybridConfig {
            force_cloud: true,
            ..HybridConfig::fast()
        };

        let first = manager.execute(Prompt::new("same prompt"), config.clone()).await;
        assert!(first.is_ok());

        let second = manager.execute(Prompt::new("same prompt"), config).await;
        assert!(matches!(second, Err(RuntimeError::DeterministicViolation(_))));
    }

    struct SlowCloud;

    #[async_trait]
    impl CloudProviderClient for SlowCloud {
        fn provider(&self) -> CloudProvider {
            CloudProvider::Anthropic
        }

        fn has_credential(&self) -> bool {
            true
        }

        async fn generate(&self, _messages: &[CloudMessage], _config: &ProviderConfig) -> CloudResult<String> {
            tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
            Ok("too slow to matter".to_string())
        }

        async fn generate_streaming(&self, _messages: &[CloudMessage], _config: &ProviderConfig) -> CloudResult<StreamBox> {
            unreachable!("manager tests only exercise non-streaming generate")
        }
    }

    #[tokio::test]
    async fn a_critical_cancellation_preempts_an_in_flight_call() {
        let local = Arc::new(LocalEngineFacade::new(FixedCeilingProbe::new(64 * (1 << 30)), StubBackend));
        let router = Arc::new(ShadowRouter::new(NullAuditSink));
        let cloud = crate::clients::CloudClients::single(Arc::new(SlowCloud));
        let manager: Arc<HybridExecutionManager<FixedCeilingProbe, StubBackend, NullAuditSink>> = Arc::new(
            HybridExecutionManager::new(local, router, cloud, RetryPolicy::default(), ample_context(), SlaEnvelope::default()),
        );

        let token = manager.cancellation_token();
        let running = manager.clone();
        let config = HybridConfig {
            force_cloud: true,
            ..HybridConfig::fast()
        };
        let handle = tokio::spawn(async move { running.execute(Prompt::new("hi"), config).await });

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        token.cancel();

        let result = handle.await.expect("execute task panicked");
        assert!(matches!(result, Err(RuntimeError::CancellationRequested)));
    }
}
