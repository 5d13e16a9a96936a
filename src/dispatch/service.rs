//! Synthesis dispatch service
//!
//! Orchestrates one request end to end: resolve the parameter vector, select
//! an engine, gate on availability, run the bounded backend call, and fold
//! every outcome into a `SynthesisResult`. No error leaves this boundary as
//! a fault; callers always get a normal-control-flow result object.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tracing::{info, warn};

use crate::core::error::SynthesisError;
use crate::engine::{EngineRegistry, EngineRequest, EngineStatus, SynthesisResult};
use crate::params::{ParameterResolver, ProfileLookup, SafetyBand};

/// One synthesis request as the caller (an HTTP layer, a worker) hands it in.
#[derive(Clone)]
pub struct SynthesisJob {
    pub text: String,
    pub voice_id: String,
    pub technique_id: Option<String>,
    pub emotion_id: Option<String>,
    /// Explicit engine name; the configured default when absent.
    pub engine: Option<String>,
    /// Output format override: wav, mp3, ogg.
    pub output_format: Option<String>,
    pub sample_rate: Option<u32>,
    /// Caller deadline; the engine's default timeout when absent.
    pub timeout: Option<Duration>,
    /// Cancellation signal; the request aborts when it turns true.
    pub cancel: Option<watch::Receiver<bool>>,
}

impl SynthesisJob {
    pub fn new(text: impl Into<String>, voice_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice_id: voice_id.into(),
            technique_id: None,
            emotion_id: None,
            engine: None,
            output_format: None,
            sample_rate: None,
            timeout: None,
            cancel: None,
        }
    }
}

pub struct SynthesisService {
    resolver: ParameterResolver,
    lookup: Arc<dyn ProfileLookup>,
    registry: Arc<EngineRegistry>,
    safety_band: SafetyBand,
}

impl SynthesisService {
    pub fn new(
        lookup: Arc<dyn ProfileLookup>,
        registry: Arc<EngineRegistry>,
        safety_band: SafetyBand,
    ) -> Self {
        Self {
            resolver: ParameterResolver::new(Arc::clone(&lookup)),
            lookup,
            registry,
            safety_band,
        }
    }

    /// Dispatch one synthesis request. Request-local state only; safe to
    /// call concurrently from independent tasks.
    pub async fn synthesize(&self, mut job: SynthesisJob) -> SynthesisResult {
        let started = Instant::now();

        let mut params = match self.resolver.resolve(
            &job.voice_id,
            job.technique_id.as_deref(),
            job.emotion_id.as_deref(),
        ) {
            Ok(params) => params,
            Err(e) => {
                warn!(error = %e, "parameter resolution failed");
                return SynthesisResult::failure(e.to_string());
            }
        };

        let engine = match self.registry.select(job.engine.as_deref()) {
            Ok(engine) => engine,
            Err(e) => {
                warn!(error = %e, "engine selection failed");
                let mut result = SynthesisResult::failure(e.to_string());
                if let Some(name) = job.engine.take() {
                    result.engine = name;
                }
                return result;
            }
        };
        let engine_name = engine.name().to_string();

        // Multipliers leave the resolver nominal; clamp into the safety band
        // right before the engine sees them.
        params.clamp_multipliers(&self.safety_band);

        let mut request = EngineRequest::new(job.text.clone(), params);
        request.model = self.lookup.voice(&job.voice_id).and_then(|v| v.model);
        if let Some(format) = job.output_format.take() {
            request.output_format = format;
        }
        if let Some(rate) = job.sample_rate {
            request.sample_rate = rate;
        }

        let deadline = job.timeout.unwrap_or_else(|| engine.default_timeout());
        info!(engine = %engine_name, timeout_ms = deadline.as_millis() as u64, "dispatching synthesis");

        let outcome = tokio::select! {
            _ = cancelled(job.cancel.as_mut()) => Err(SynthesisError::Cancelled {
                engine: engine_name.clone(),
            }),
            call = tokio::time::timeout(deadline, engine.synthesize(&request)) => match call {
                Ok(result) => result,
                Err(_) => Err(SynthesisError::Timeout {
                    engine: engine_name.clone(),
                    elapsed_ms: deadline.as_millis() as u64,
                }),
            },
        };

        match outcome {
            Ok(mut result) => {
                result.processing_time_ms = started.elapsed().as_millis() as u64;
                result
            }
            Err(e) => {
                warn!(engine = %engine_name, error = %e, "synthesis failed");
                let mut result = SynthesisResult::failure(e.to_string());
                result.engine = engine_name;
                result.processing_time_ms = started.elapsed().as_millis() as u64;
                result
            }
        }
    }

    /// Status of every registered engine, for UI/status display.
    pub fn list_engines(&self) -> Vec<EngineStatus> {
        self.registry.list()
    }
}

/// Resolves when the watch flag turns true; pends forever when no signal
/// was supplied or the sender is gone.
async fn cancelled(rx: Option<&mut watch::Receiver<bool>>) {
    match rx {
        Some(rx) => loop {
            if *rx.borrow() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        },
        None => std::future::pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BootstrapConfig, MemoryConfigStore};
    use crate::engine::init_engines;
    use crate::params::builtin_catalog;

    fn service(bootstrap: BootstrapConfig) -> SynthesisService {
        let band = bootstrap.synthesis.safety_band;
        let registry = init_engines(
            Arc::new(bootstrap),
            Arc::new(MemoryConfigStore::new()),
        )
        .unwrap();
        SynthesisService::new(Arc::new(builtin_catalog()), Arc::new(registry), band)
    }

    fn fast_service() -> SynthesisService {
        let mut bootstrap = BootstrapConfig::default();
        bootstrap.synthesis.mock.delay_ms = 1;
        service(bootstrap)
    }

    #[tokio::test]
    async fn test_default_engine_dispatch() {
        let service = fast_service();
        let result = service.synthesize(SynthesisJob::new("la la", "kai")).await;
        assert!(result.success);
        assert_eq!(result.engine, "mock");
    }

    #[tokio::test]
    async fn test_unknown_voice_fails_without_fault() {
        let service = fast_service();
        let result = service.synthesize(SynthesisJob::new("la", "ghost")).await;
        assert!(!result.success);
        assert!(result.error_message.unwrap().contains("voice not found"));
    }

    #[tokio::test]
    async fn test_unknown_engine_vs_unavailable_engine() {
        let service = fast_service();

        let mut job = SynthesisJob::new("la", "kai");
        job.engine = Some("sovits".to_string());
        let not_found = service.synthesize(job).await;
        assert!(!not_found.success);
        assert!(not_found.error_message.unwrap().contains("not found"));

        let mut job = SynthesisJob::new("la", "kai");
        job.engine = Some("local-model".to_string());
        let unavailable = service.synthesize(job).await;
        assert!(!unavailable.success);
        assert!(unavailable.error_message.unwrap().contains("unavailable"));
    }

    #[tokio::test]
    async fn test_timeout_is_distinct() {
        let mut bootstrap = BootstrapConfig::default();
        bootstrap.synthesis.mock.delay_ms = 200;
        let service = service(bootstrap);

        let mut job = SynthesisJob::new("la", "kai");
        job.timeout = Some(Duration::from_millis(10));
        let result = service.synthesize(job).await;
        assert!(!result.success);
        assert!(result.error_message.unwrap().contains("timed out"));
        assert_eq!(result.engine, "mock");
    }

    #[tokio::test]
    async fn test_cancellation_is_distinct() {
        let mut bootstrap = BootstrapConfig::default();
        bootstrap.synthesis.mock.delay_ms = 500;
        let service = service(bootstrap);

        let (tx, rx) = watch::channel(false);
        let mut job = SynthesisJob::new("la", "kai");
        job.cancel = Some(rx);

        let handle = tokio::spawn(async move { service.synthesize(job).await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        tx.send(true).unwrap();

        let result = handle.await.unwrap();
        assert!(!result.success);
        assert!(result.error_message.unwrap().contains("cancelled"));
    }

    #[tokio::test]
    async fn test_list_engines() {
        let service = fast_service();
        let statuses = service.list_engines();
        assert_eq!(statuses.len(), 3);
    }
}
