//! Discrete-voice selection for backends without continuous controls
//!
//! Some backends expose a small fixed catalog of named voices instead of
//! continuous timbre parameters. The heuristic here maps the resolved
//! parameter vector onto exactly one of six voice roles; it is a pure, total
//! function with no "no match" case.

use serde::{Deserialize, Serialize};

use crate::params::ParameterVector;

/// Roles a fixed-catalog backend voice can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VoiceRole {
    /// Feminine-leaning, soft and breathy.
    SoftBreathy,
    /// Feminine-leaning, bright and energetic.
    BrightEnergetic,
    /// Feminine-leaning, warm.
    Warm,
    /// Masculine-leaning, powerful.
    Powerful,
    /// Masculine-leaning, low and calm.
    LowCalm,
    /// Neutral, balanced.
    Neutral,
}

/// Classify a parameter vector into one voice role.
///
/// Decision table: gender factor picks the branch (feminine below 35,
/// masculine above 65, neutral for 35-65 inclusive); breathiness, brightness
/// and tension pick within the branch.
pub fn classify_voice(params: &ParameterVector) -> VoiceRole {
    if params.gender_factor < 35 {
        if params.breathiness > 50 {
            VoiceRole::SoftBreathy
        } else if params.brightness > 60 {
            VoiceRole::BrightEnergetic
        } else {
            VoiceRole::Warm
        }
    } else if params.gender_factor > 65 {
        if params.tension > 60 {
            VoiceRole::Powerful
        } else {
            VoiceRole::LowCalm
        }
    } else {
        VoiceRole::Neutral
    }
}

/// Backend speed band for fixed-catalog engines.
const SPEED_MIN: f64 = 0.25;
const SPEED_MAX: f64 = 4.0;

/// Derive playback speed: tempo factor scaled by an emotion adjustment
/// (+5% above intensity 70, -5% below 30), clamped to the backend band.
pub fn derive_speed(params: &ParameterVector) -> f64 {
    let adjustment = if params.emotion_intensity > 70 {
        1.05
    } else if params.emotion_intensity < 30 {
        0.95
    } else {
        1.0
    };
    (params.tempo_factor * adjustment).clamp(SPEED_MIN, SPEED_MAX)
}

/// Mapping from voice roles to a backend's named voices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedVoiceCatalog {
    pub soft_breathy: String,
    pub bright_energetic: String,
    pub warm: String,
    pub powerful: String,
    pub low_calm: String,
    pub neutral: String,
}

impl NamedVoiceCatalog {
    pub fn voice_for(&self, role: VoiceRole) -> &str {
        match role {
            VoiceRole::SoftBreathy => &self.soft_breathy,
            VoiceRole::BrightEnergetic => &self.bright_energetic,
            VoiceRole::Warm => &self.warm,
            VoiceRole::Powerful => &self.powerful,
            VoiceRole::LowCalm => &self.low_calm,
            VoiceRole::Neutral => &self.neutral,
        }
    }

    /// Select the named voice for a parameter vector.
    pub fn select(&self, params: &ParameterVector) -> &str {
        self.voice_for(classify_voice(params))
    }
}

impl Default for NamedVoiceCatalog {
    /// The six OpenAI-style TTS voices.
    fn default() -> Self {
        Self {
            soft_breathy: "shimmer".to_string(),
            bright_energetic: "nova".to_string(),
            warm: "fable".to_string(),
            powerful: "onyx".to_string(),
            low_calm: "echo".to_string(),
            neutral: "alloy".to_string(),
        }
    }
}
