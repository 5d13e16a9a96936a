//! Core trait for synthesis engines
//!
//! Every backend (mock, cloud TTS, local GPU service) sits behind the same
//! capability-advertising interface. Engines are stateless across calls; the
//! only gate is the two-valued availability check, evaluated lazily per call
//! and never via network I/O.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::params::{ModelRef, ParameterVector};

/// Capabilities an engine advertises. Immutable after registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineDescriptor {
    /// Unique engine name, used as the dispatch key.
    pub name: String,
    pub supports_emotion_control: bool,
    pub supports_technique_control: bool,
    pub supports_pitch_shift: bool,
    pub supports_tempo_change: bool,
    pub supports_realtime_synthesis: bool,
    /// Longest clip the backend will produce, in seconds.
    pub max_duration_seconds: u32,
    /// ISO 639-1 language codes.
    pub supported_languages: Vec<String>,
}

/// One synthesis call: text plus the fully resolved parameter vector.
#[derive(Debug, Clone)]
pub struct EngineRequest {
    /// Lyrics/text to synthesize.
    pub text: String,
    /// Resolved parameters, multipliers already clamped to the safety band.
    pub params: ParameterVector,
    /// Backend model binding from the voice profile, if any.
    pub model: Option<ModelRef>,
    /// Requested output format: wav, mp3, ogg.
    pub output_format: String,
    /// Requested sample rate.
    pub sample_rate: u32,
}

impl EngineRequest {
    pub fn new(text: impl Into<String>, params: ParameterVector) -> Self {
        Self {
            text: text.into(),
            params,
            model: None,
            output_format: "wav".to_string(),
            sample_rate: 44100,
        }
    }
}

/// Outcome of one synthesis call. All paths converge here: callers never see
/// an unhandled fault out of the dispatch boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SynthesisResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Audio by URL, file path, or inline bytes; engines fill whichever
    /// applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_data: Option<Vec<u8>>,
    pub format: String,
    pub duration_seconds: f64,
    pub sample_rate: u32,
    /// Engine that produced the result.
    pub engine: String,
    pub processing_time_ms: u64,
    /// Engine-specific extras (selected voice, speed, model).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl SynthesisResult {
    /// Failure result carrying a human-actionable message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: Some(message.into()),
            ..Default::default()
        }
    }
}

/// Core trait all synthesis engines implement.
#[async_trait]
pub trait SynthesisEngine: Send + Sync {
    /// Unique engine name.
    fn name(&self) -> &str;

    /// True iff required credentials/config are present and non-placeholder.
    /// Must be cheap: a presence check, never a network round trip.
    fn is_available(&self) -> bool;

    /// Static capability descriptor.
    fn descriptor(&self) -> EngineDescriptor;

    /// Deadline applied when the caller supplies none.
    fn default_timeout(&self) -> Duration {
        Duration::from_secs(60)
    }

    /// Perform (or simulate) the synthesis call. Backend and network errors
    /// come back as `EngineCallFailed`; the dispatch layer converts every
    /// error into a failure `SynthesisResult`.
    async fn synthesize(&self, request: &EngineRequest) -> Result<SynthesisResult>;
}
