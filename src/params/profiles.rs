//! Voice, technique and emotion profiles
//!
//! Named, independently configured parameter presets. The crate consumes
//! them through the `ProfileLookup` seam; their persistence lives elsewhere.
//! `MemoryProfileCatalog` is the provided in-memory implementation, seeded by
//! `builtin_catalog` so the crate is usable out of the box.

use std::path::PathBuf;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use super::vector::{ParameterVector, PhonationType};

/// Backend model reference for voices bound to a specific engine model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRef {
    /// Engine the model belongs to.
    pub engine: String,
    /// Model file path.
    pub path: PathBuf,
    /// Speaker index for multi-speaker models.
    pub speaker_id: u32,
}

/// A singer voice: identity plus default synthesis parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceProfile {
    pub id: String,
    pub name: String,
    /// Parameter defaults each request starts from.
    pub defaults: ParameterVector,
    /// Optional backend model binding.
    pub model: Option<ModelRef>,
}

/// Timbre fields a technique overrides wholesale. Technique parameters are
/// authoritative, not blended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechniqueParams {
    pub vibrato_depth: i32,
    pub vibrato_rate: i32,
    pub breathiness: i32,
    pub tension: i32,
    pub brightness: i32,
    pub phonation_type: PhonationType,
}

/// A singing technique: what the voice is doing, as a categorical choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechniqueProfile {
    pub id: String,
    pub name: String,
    pub params: TechniqueParams,
}

/// Emotion adjustments: replacements for the emotion-owned fields plus
/// multiplicative modifiers layered on whatever the prior steps produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionParams {
    pub intensity: i32,
    pub pitch_variance: f64,
    pub energy_multiplier: f64,
    pub tempo_factor: f64,
    pub vibrato_depth_modifier: f64,
    pub tension_modifier: f64,
}

/// A singing emotion: how much, as a scalar adjustment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionProfile {
    pub id: String,
    pub name: String,
    pub params: EmotionParams,
}

/// Lookup-by-id seam for the three profile kinds.
pub trait ProfileLookup: Send + Sync {
    fn voice(&self, id: &str) -> Option<VoiceProfile>;
    fn technique(&self, id: &str) -> Option<TechniqueProfile>;
    fn emotion(&self, id: &str) -> Option<EmotionProfile>;
}

/// In-memory profile catalog.
pub struct MemoryProfileCatalog {
    voices: DashMap<String, VoiceProfile>,
    techniques: DashMap<String, TechniqueProfile>,
    emotions: DashMap<String, EmotionProfile>,
}

impl MemoryProfileCatalog {
    pub fn new() -> Self {
        Self {
            voices: DashMap::new(),
            techniques: DashMap::new(),
            emotions: DashMap::new(),
        }
    }

    pub fn register_voice(&self, voice: VoiceProfile) {
        self.voices.insert(voice.id.clone(), voice);
    }

    pub fn register_technique(&self, technique: TechniqueProfile) {
        self.techniques.insert(technique.id.clone(), technique);
    }

    pub fn register_emotion(&self, emotion: EmotionProfile) {
        self.emotions.insert(emotion.id.clone(), emotion);
    }

    pub fn voice_count(&self) -> usize {
        self.voices.len()
    }
}

impl Default for MemoryProfileCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileLookup for MemoryProfileCatalog {
    fn voice(&self, id: &str) -> Option<VoiceProfile> {
        self.voices.get(id).map(|e| e.value().clone())
    }

    fn technique(&self, id: &str) -> Option<TechniqueProfile> {
        self.techniques.get(id).map(|e| e.value().clone())
    }

    fn emotion(&self, id: &str) -> Option<EmotionProfile> {
        self.emotions.get(id).map(|e| e.value().clone())
    }
}

/// Catalog seeded with a small set of voices, techniques and emotions.
pub fn builtin_catalog() -> MemoryProfileCatalog {
    let catalog = MemoryProfileCatalog::new();

    catalog.register_voice(VoiceProfile {
        id: "aurora".to_string(),
        name: "Aurora".to_string(),
        defaults: ParameterVector {
            vibrato_depth: 45,
            vibrato_rate: 55,
            breathiness: 60,
            tension: 35,
            brightness: 50,
            gender_factor: 20,
            ..ParameterVector::default()
        },
        model: None,
    });
    catalog.register_voice(VoiceProfile {
        id: "orion".to_string(),
        name: "Orion".to_string(),
        defaults: ParameterVector {
            vibrato_depth: 40,
            vibrato_rate: 45,
            breathiness: 20,
            tension: 65,
            brightness: 40,
            gender_factor: 80,
            ..ParameterVector::default()
        },
        model: Some(ModelRef {
            engine: "local-model".to_string(),
            path: PathBuf::from("/models/sovits/orion.pth"),
            speaker_id: 0,
        }),
    });
    catalog.register_voice(VoiceProfile {
        id: "kai".to_string(),
        name: "Kai".to_string(),
        defaults: ParameterVector::default(),
        model: None,
    });

    catalog.register_technique(TechniqueProfile {
        id: "belting".to_string(),
        name: "Belting".to_string(),
        params: TechniqueParams {
            vibrato_depth: 35,
            vibrato_rate: 50,
            breathiness: 10,
            tension: 85,
            brightness: 80,
            phonation_type: PhonationType::Mixed,
        },
    });
    catalog.register_technique(TechniqueProfile {
        id: "breathy-whisper".to_string(),
        name: "Breathy Whisper".to_string(),
        params: TechniqueParams {
            vibrato_depth: 20,
            vibrato_rate: 40,
            breathiness: 90,
            tension: 20,
            brightness: 35,
            phonation_type: PhonationType::Breathy,
        },
    });
    catalog.register_technique(TechniqueProfile {
        id: "operatic-vibrato".to_string(),
        name: "Operatic Vibrato".to_string(),
        params: TechniqueParams {
            vibrato_depth: 80,
            vibrato_rate: 65,
            breathiness: 15,
            tension: 60,
            brightness: 55,
            phonation_type: PhonationType::Normal,
        },
    });

    catalog.register_emotion(EmotionProfile {
        id: "joyful".to_string(),
        name: "Joyful".to_string(),
        params: EmotionParams {
            intensity: 75,
            pitch_variance: 1.2,
            energy_multiplier: 1.3,
            tempo_factor: 1.1,
            vibrato_depth_modifier: 1.1,
            tension_modifier: 0.9,
        },
    });
    catalog.register_emotion(EmotionProfile {
        id: "melancholy".to_string(),
        name: "Melancholy".to_string(),
        params: EmotionParams {
            intensity: 40,
            pitch_variance: 0.8,
            energy_multiplier: 0.7,
            tempo_factor: 0.85,
            vibrato_depth_modifier: 1.2,
            tension_modifier: 0.8,
        },
    });
    catalog.register_emotion(EmotionProfile {
        id: "furious".to_string(),
        name: "Furious".to_string(),
        params: EmotionParams {
            intensity: 90,
            pitch_variance: 1.4,
            energy_multiplier: 1.5,
            tempo_factor: 1.15,
            vibrato_depth_modifier: 0.7,
            tension_modifier: 1.5,
        },
    });
    catalog.register_emotion(EmotionProfile {
        id: "serene".to_string(),
        name: "Serene".to_string(),
        params: EmotionParams {
            intensity: 25,
            pitch_variance: 0.9,
            energy_multiplier: 0.8,
            tempo_factor: 0.95,
            vibrato_depth_modifier: 0.9,
            tension_modifier: 0.7,
        },
    });

    catalog
}
