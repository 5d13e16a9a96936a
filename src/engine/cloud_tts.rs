//! Generic cloud TTS engine
//!
//! Backend with a small fixed catalog of named voices and no continuous
//! timbre controls: the resolved parameter vector degrades onto a named
//! voice via the discrete heuristic, and tempo/emotion onto a single speed
//! value. Credentials come through the config source (database record over
//! bootstrap) at call time.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::config::{CloudTtsBootstrap, ConfigRecord, ConfigSource, ProviderRecord};
use crate::core::error::{Result, SynthesisError};

use super::traits::{EngineDescriptor, EngineRequest, SynthesisEngine, SynthesisResult};
use super::voice_map::{derive_speed, NamedVoiceCatalog};

pub const CLOUD_TTS_ENGINE_NAME: &str = "cloud-tts";

const DEFAULT_API_URL: &str = "https://api.openai.com/v1";

pub struct CloudTtsEngine {
    settings: CloudTtsBootstrap,
    credentials: ConfigSource<ProviderRecord>,
    voices: NamedVoiceCatalog,
    http: reqwest::Client,
}

impl CloudTtsEngine {
    pub fn new(settings: CloudTtsBootstrap, credentials: ConfigSource<ProviderRecord>) -> Self {
        Self {
            settings,
            credentials,
            voices: NamedVoiceCatalog::default(),
            http: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, record: &ProviderRecord) -> String {
        let base = if record.api_url.is_empty() {
            DEFAULT_API_URL
        } else {
            record.api_url.as_str()
        };
        format!("{}/audio/speech", base.trim_end_matches('/'))
    }

    fn model_name(&self, record: &ProviderRecord) -> String {
        if record.model.is_empty() {
            self.settings.model.clone()
        } else {
            record.model.clone()
        }
    }
}

/// Rough clip length: ~0.3 s per non-whitespace character, scaled by speed.
fn estimate_duration(text: &str, speed: f64) -> f64 {
    let chars = text.chars().filter(|c| !c.is_whitespace()).count();
    (chars as f64 * 0.3) / speed
}

#[async_trait]
impl SynthesisEngine for CloudTtsEngine {
    fn name(&self) -> &str {
        CLOUD_TTS_ENGINE_NAME
    }

    fn is_available(&self) -> bool {
        // Credential presence only; resolution is in-memory, no network.
        self.credentials
            .resolve(&self.settings.provider)
            .value
            .is_usable()
    }

    fn descriptor(&self) -> EngineDescriptor {
        EngineDescriptor {
            name: CLOUD_TTS_ENGINE_NAME.to_string(),
            supports_emotion_control: true,
            supports_technique_control: false,
            supports_pitch_shift: false,
            supports_tempo_change: true,
            supports_realtime_synthesis: false,
            max_duration_seconds: 300,
            supported_languages: ["zh", "en", "ja", "ko", "es", "fr", "de", "it", "pt", "ru"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.timeout_secs)
    }

    async fn synthesize(&self, request: &EngineRequest) -> Result<SynthesisResult> {
        let started = Instant::now();

        let record = self.credentials.resolve(&self.settings.provider).value;
        if !record.is_usable() {
            return Err(SynthesisError::EngineUnavailable {
                name: CLOUD_TTS_ENGINE_NAME.to_string(),
                reason: format!("missing credential for provider {}", self.settings.provider),
            });
        }

        let voice = self.voices.select(&request.params).to_string();
        let speed = derive_speed(&request.params);
        let model = self.model_name(&record);

        let body = json!({
            "model": model,
            "input": request.text,
            "voice": voice,
            "speed": speed,
            "response_format": self.settings.response_format,
        });

        info!(
            voice = %voice,
            speed,
            text_length = request.text.len(),
            "calling cloud TTS backend"
        );

        let response = self
            .http
            .post(self.endpoint(&record))
            .bearer_auth(&record.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SynthesisError::EngineCallFailed {
                engine: CLOUD_TTS_ENGINE_NAME.to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(SynthesisError::EngineCallFailed {
                engine: CLOUD_TTS_ENGINE_NAME.to_string(),
                message: format!("backend returned {}: {}", status, detail),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::EngineCallFailed {
                engine: CLOUD_TTS_ENGINE_NAME.to_string(),
                message: format!("failed to read audio body: {}", e),
            })?;

        let file_name = format!("tts_{}.{}", Uuid::new_v4(), self.settings.response_format);
        tokio::fs::create_dir_all(&self.settings.output_dir).await?;
        let output_path = self.settings.output_dir.join(&file_name);
        tokio::fs::write(&output_path, &bytes).await?;

        info!(path = %output_path.display(), "cloud TTS synthesis complete");

        let mut result = SynthesisResult {
            success: true,
            audio_url: Some(format!("/audio/{}", file_name)),
            audio_path: Some(output_path.display().to_string()),
            format: self.settings.response_format.clone(),
            duration_seconds: estimate_duration(&request.text, speed),
            sample_rate: self.settings.sample_rate,
            engine: CLOUD_TTS_ENGINE_NAME.to_string(),
            processing_time_ms: started.elapsed().as_millis() as u64,
            ..Default::default()
        };
        result.metadata.insert("voice".to_string(), voice);
        result.metadata.insert("speed".to_string(), speed.to_string());
        result.metadata.insert("model".to_string(), model);
        Ok(result)
    }
}
