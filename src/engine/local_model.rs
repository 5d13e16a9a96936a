//! Local GPU-backed model service engine
//!
//! Bridges to a So-VITS-style synthesis service running on localhost. Unlike
//! the cloud backend it accepts the full continuous parameter set, so the
//! vector is forwarded as-is alongside the voice's model binding. Calls can
//! run long on GPU hardware, hence the larger default timeout.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::config::{credential_present, LocalModelBootstrap};
use crate::core::error::{Result, SynthesisError};

use super::traits::{EngineDescriptor, EngineRequest, SynthesisEngine, SynthesisResult};

pub const LOCAL_MODEL_ENGINE_NAME: &str = "local-model";

pub struct LocalModelEngine {
    settings: LocalModelBootstrap,
    http: reqwest::Client,
}

impl LocalModelEngine {
    pub fn new(settings: LocalModelBootstrap) -> Self {
        Self {
            settings,
            http: reqwest::Client::new(),
        }
    }
}

/// Response shape of the local service.
#[derive(Debug, Deserialize)]
struct LocalServiceResponse {
    audio_path: String,
    #[serde(default)]
    duration_seconds: f64,
    #[serde(default)]
    sample_rate: Option<u32>,
}

#[async_trait]
impl SynthesisEngine for LocalModelEngine {
    fn name(&self) -> &str {
        LOCAL_MODEL_ENGINE_NAME
    }

    fn is_available(&self) -> bool {
        self.settings.enabled && credential_present(&self.settings.api_url)
    }

    fn descriptor(&self) -> EngineDescriptor {
        EngineDescriptor {
            name: LOCAL_MODEL_ENGINE_NAME.to_string(),
            supports_emotion_control: true,
            supports_technique_control: true,
            supports_pitch_shift: true,
            supports_tempo_change: true,
            supports_realtime_synthesis: false,
            max_duration_seconds: 600,
            supported_languages: vec!["zh".to_string(), "en".to_string(), "ja".to_string()],
        }
    }

    fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.timeout_secs)
    }

    async fn synthesize(&self, request: &EngineRequest) -> Result<SynthesisResult> {
        let started = Instant::now();

        if !self.is_available() {
            return Err(SynthesisError::EngineUnavailable {
                name: LOCAL_MODEL_ENGINE_NAME.to_string(),
                reason: "service disabled or api_url not configured".to_string(),
            });
        }

        let (model_path, speaker_id) = match &request.model {
            Some(model) => (model.path.display().to_string(), model.speaker_id),
            None => (
                self.settings.models_path.join("default.pth").display().to_string(),
                0,
            ),
        };

        let p = &request.params;
        let body = json!({
            "text": request.text,
            "model_path": model_path,
            "speaker_id": speaker_id,
            "sample_rate": self.settings.sample_rate,
            "output_format": request.output_format,
            "params": {
                "vibrato_depth": p.vibrato_depth,
                "vibrato_rate": p.vibrato_rate,
                "breathiness": p.breathiness,
                "tension": p.tension,
                "brightness": p.brightness,
                "gender_factor": p.gender_factor,
                "emotion_intensity": p.emotion_intensity,
                "pitch_variance": p.pitch_variance,
                "energy_multiplier": p.energy_multiplier,
                "tempo_factor": p.tempo_factor,
                "phonation_type": p.phonation_type.to_string(),
            },
        });

        let url = format!("{}/synthesize", self.settings.api_url.trim_end_matches('/'));
        info!(url = %url, model = %model_path, speaker_id, "calling local model service");

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| SynthesisError::EngineCallFailed {
                engine: LOCAL_MODEL_ENGINE_NAME.to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(SynthesisError::EngineCallFailed {
                engine: LOCAL_MODEL_ENGINE_NAME.to_string(),
                message: format!("service returned {}: {}", status, detail),
            });
        }

        let parsed: LocalServiceResponse =
            response
                .json()
                .await
                .map_err(|e| SynthesisError::EngineCallFailed {
                    engine: LOCAL_MODEL_ENGINE_NAME.to_string(),
                    message: format!("invalid service response: {}", e),
                })?;

        let mut result = SynthesisResult {
            success: true,
            audio_path: Some(parsed.audio_path),
            format: request.output_format.clone(),
            duration_seconds: parsed.duration_seconds,
            sample_rate: parsed.sample_rate.unwrap_or(self.settings.sample_rate),
            engine: LOCAL_MODEL_ENGINE_NAME.to_string(),
            processing_time_ms: started.elapsed().as_millis() as u64,
            ..Default::default()
        };
        result.metadata.insert("model_path".to_string(), model_path);
        result
            .metadata
            .insert("speaker_id".to_string(), speaker_id.to_string());
        Ok(result)
    }
}
