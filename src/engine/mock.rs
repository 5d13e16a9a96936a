//! Mock synthesis engine for development and testing
//!
//! Simulates a real engine: honors the configured delay, logs the resolved
//! parameters it would synthesize with, and returns a placeholder clip.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::debug;

use crate::config::MockBootstrap;
use crate::core::error::Result;

use super::traits::{EngineDescriptor, EngineRequest, SynthesisEngine, SynthesisResult};

pub const MOCK_ENGINE_NAME: &str = "mock";

pub struct MockEngine {
    settings: MockBootstrap,
}

impl MockEngine {
    pub fn new(settings: MockBootstrap) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl SynthesisEngine for MockEngine {
    fn name(&self) -> &str {
        MOCK_ENGINE_NAME
    }

    fn is_available(&self) -> bool {
        self.settings.enabled
    }

    fn descriptor(&self) -> EngineDescriptor {
        EngineDescriptor {
            name: MOCK_ENGINE_NAME.to_string(),
            supports_emotion_control: true,
            supports_technique_control: true,
            supports_pitch_shift: true,
            supports_tempo_change: true,
            supports_realtime_synthesis: false,
            max_duration_seconds: 300,
            supported_languages: vec!["zh".to_string(), "en".to_string(), "ja".to_string()],
        }
    }

    async fn synthesize(&self, request: &EngineRequest) -> Result<SynthesisResult> {
        let started = Instant::now();

        let p = &request.params;
        debug!(
            vibrato_depth = p.vibrato_depth,
            breathiness = p.breathiness,
            tension = p.tension,
            emotion_intensity = p.emotion_intensity,
            phonation = %p.phonation_type,
            "mock engine synthesizing"
        );

        tokio::time::sleep(Duration::from_millis(self.settings.delay_ms)).await;

        Ok(SynthesisResult {
            success: true,
            audio_url: Some("/mock-audio/sample.mp3".to_string()),
            format: "mp3".to_string(),
            duration_seconds: 30.0,
            sample_rate: request.sample_rate,
            engine: MOCK_ENGINE_NAME.to_string(),
            processing_time_ms: started.elapsed().as_millis() as u64,
            ..Default::default()
        })
    }
}
