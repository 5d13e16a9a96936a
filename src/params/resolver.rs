//! Three-layer parameter overlay
//!
//! Voice defaults, then technique override, then emotion modulation, in
//! strict order. Techniques model what the voice is doing (categorical, so
//! they replace); emotions model how much (scalar, so they modulate on top
//! of whatever technique is active). A missing voice is fatal; missing
//! optional layers are logged and skipped, never aborting synthesis.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::core::error::{Result, SynthesisError};

use super::profiles::ProfileLookup;
use super::vector::ParameterVector;

/// Applies the overlay algorithm against a profile lookup.
pub struct ParameterResolver {
    lookup: Arc<dyn ProfileLookup>,
}

impl ParameterResolver {
    pub fn new(lookup: Arc<dyn ProfileLookup>) -> Self {
        Self { lookup }
    }

    /// Resolve the final parameter vector for one request.
    pub fn resolve(
        &self,
        voice_id: &str,
        technique_id: Option<&str>,
        emotion_id: Option<&str>,
    ) -> Result<ParameterVector> {
        // Step 1: voice defaults. Deep copy; the profile's vector is never
        // mutated.
        let voice = self
            .lookup
            .voice(voice_id)
            .ok_or_else(|| SynthesisError::VoiceNotFound {
                voice_id: voice_id.to_string(),
            })?;
        let mut vector = voice.defaults.clone();
        debug!(voice = %voice.name, "applied voice defaults");

        // Step 2: technique override, wholesale.
        if let Some(id) = technique_id {
            match self.lookup.technique(id) {
                Some(technique) => {
                    let p = &technique.params;
                    vector.vibrato_depth = p.vibrato_depth;
                    vector.vibrato_rate = p.vibrato_rate;
                    vector.breathiness = p.breathiness;
                    vector.tension = p.tension;
                    vector.brightness = p.brightness;
                    vector.phonation_type = p.phonation_type;
                    debug!(technique = %technique.name, "applied technique override");
                }
                None => {
                    warn!(technique_id = id, "technique not found, skipping layer");
                }
            }
        }

        // Step 3: emotion replacement, then multiplicative modulation.
        if let Some(id) = emotion_id {
            match self.lookup.emotion(id) {
                Some(emotion) => {
                    let p = &emotion.params;
                    vector.emotion_intensity = p.intensity;
                    vector.pitch_variance = p.pitch_variance;
                    vector.energy_multiplier = p.energy_multiplier;
                    vector.tempo_factor = p.tempo_factor;
                    vector.vibrato_depth =
                        ParameterVector::modulate(vector.vibrato_depth, p.vibrato_depth_modifier);
                    vector.tension =
                        ParameterVector::modulate(vector.tension, p.tension_modifier);
                    debug!(emotion = %emotion.name, "applied emotion modulation");
                }
                None => {
                    warn!(emotion_id = id, "emotion not found, skipping layer");
                }
            }
        }

        vector.clamp_scales();
        Ok(vector)
    }
}
