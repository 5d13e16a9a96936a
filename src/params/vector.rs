//! The resolved parameter vector for one synthesis call
//!
//! All controllable synthesis dimensions in one bounded struct. Integer
//! fields live on a closed 0-100 scale and are clamped after every
//! modification; float multipliers are clamped into a configured safety band
//! before any engine sees them. One vector per request, owned by the
//! resolution call that built it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Phonation type produced by the voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhonationType {
    #[default]
    Normal,
    Breathy,
    Falsetto,
    Mixed,
    Growl,
    Crying,
}

impl fmt::Display for PhonationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PhonationType::Normal => "normal",
            PhonationType::Breathy => "breathy",
            PhonationType::Falsetto => "falsetto",
            PhonationType::Mixed => "mixed",
            PhonationType::Growl => "growl",
            PhonationType::Crying => "crying",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for PhonationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(PhonationType::Normal),
            "breathy" => Ok(PhonationType::Breathy),
            "falsetto" => Ok(PhonationType::Falsetto),
            "mixed" => Ok(PhonationType::Mixed),
            "growl" => Ok(PhonationType::Growl),
            "crying" => Ok(PhonationType::Crying),
            other => Err(format!("unknown phonation type: {}", other)),
        }
    }
}

/// Clamp band applied to float multipliers before dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafetyBand {
    pub min: f64,
    pub max: f64,
}

impl Default for SafetyBand {
    fn default() -> Self {
        Self { min: 0.25, max: 4.0 }
    }
}

impl SafetyBand {
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// All controllable synthesis dimensions for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterVector {
    /// Vibrato depth, 0-100.
    pub vibrato_depth: i32,
    /// Vibrato rate, 0-100.
    pub vibrato_rate: i32,
    /// Breathiness, 0-100.
    pub breathiness: i32,
    /// Vocal tension, 0-100.
    pub tension: i32,
    /// Brightness, 0-100.
    pub brightness: i32,
    /// Gender factor, 0-100 (0 = feminine, 100 = masculine).
    pub gender_factor: i32,
    /// Emotion intensity, 0-100.
    pub emotion_intensity: i32,
    /// Pitch variance multiplier, nominal 0.5-2.0.
    pub pitch_variance: f64,
    /// Energy multiplier, nominal 0.5-2.0.
    pub energy_multiplier: f64,
    /// Tempo multiplier, nominal 0.5-2.0.
    pub tempo_factor: f64,
    /// Phonation type.
    pub phonation_type: PhonationType,
}

impl Default for ParameterVector {
    fn default() -> Self {
        Self {
            vibrato_depth: 50,
            vibrato_rate: 50,
            breathiness: 30,
            tension: 50,
            brightness: 50,
            gender_factor: 50,
            emotion_intensity: 50,
            pitch_variance: 1.0,
            energy_multiplier: 1.0,
            tempo_factor: 1.0,
            phonation_type: PhonationType::Normal,
        }
    }
}

/// Clamp a scale value to the closed 0-100 range.
pub fn clamp_scale(value: i32) -> i32 {
    value.clamp(0, 100)
}

impl ParameterVector {
    /// Re-establish the 0-100 invariant on every scale field.
    pub fn clamp_scales(&mut self) {
        self.vibrato_depth = clamp_scale(self.vibrato_depth);
        self.vibrato_rate = clamp_scale(self.vibrato_rate);
        self.breathiness = clamp_scale(self.breathiness);
        self.tension = clamp_scale(self.tension);
        self.brightness = clamp_scale(self.brightness);
        self.gender_factor = clamp_scale(self.gender_factor);
        self.emotion_intensity = clamp_scale(self.emotion_intensity);
    }

    /// Clamp float multipliers into the safety band. Runs once, right before
    /// the vector is handed to an engine.
    pub fn clamp_multipliers(&mut self, band: &SafetyBand) {
        self.pitch_variance = band.clamp(self.pitch_variance);
        self.energy_multiplier = band.clamp(self.energy_multiplier);
        self.tempo_factor = band.clamp(self.tempo_factor);
    }

    /// Multiply `value` by `modifier`, round to nearest, clamp to 0-100.
    pub fn modulate(value: i32, modifier: f64) -> i32 {
        clamp_scale((value as f64 * modifier).round() as i32)
    }

    /// True when every scale field is within 0-100.
    pub fn scales_in_range(&self) -> bool {
        [
            self.vibrato_depth,
            self.vibrato_rate,
            self.breathiness,
            self.tension,
            self.brightness,
            self.gender_factor,
            self.emotion_intensity,
        ]
        .iter()
        .all(|v| (0..=100).contains(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_request_baseline() {
        let vector = ParameterVector::default();
        assert_eq!(vector.vibrato_depth, 50);
        assert_eq!(vector.breathiness, 30);
        assert_eq!(vector.gender_factor, 50);
        assert_eq!(vector.tempo_factor, 1.0);
        assert_eq!(vector.phonation_type, PhonationType::Normal);
        assert!(vector.scales_in_range());
    }

    #[test]
    fn test_clamp_scales() {
        let mut vector = ParameterVector {
            vibrato_depth: 180,
            tension: -20,
            ..ParameterVector::default()
        };
        vector.clamp_scales();
        assert_eq!(vector.vibrato_depth, 100);
        assert_eq!(vector.tension, 0);
        assert!(vector.scales_in_range());
    }

    #[test]
    fn test_clamp_multipliers_into_band() {
        let mut vector = ParameterVector {
            pitch_variance: 9.0,
            energy_multiplier: 0.01,
            tempo_factor: 1.5,
            ..ParameterVector::default()
        };
        vector.clamp_multipliers(&SafetyBand::default());
        assert_eq!(vector.pitch_variance, 4.0);
        assert_eq!(vector.energy_multiplier, 0.25);
        assert_eq!(vector.tempo_factor, 1.5);
    }

    #[test]
    fn test_modulate_rounds_then_clamps() {
        assert_eq!(ParameterVector::modulate(80, 0.5), 40);
        assert_eq!(ParameterVector::modulate(80, 1.5), 100);
        assert_eq!(ParameterVector::modulate(33, 1.5), 50); // 49.5 rounds up
        assert_eq!(ParameterVector::modulate(10, 0.0), 0);
    }

    #[test]
    fn test_phonation_round_trip() {
        for phonation in [
            PhonationType::Normal,
            PhonationType::Breathy,
            PhonationType::Falsetto,
            PhonationType::Mixed,
            PhonationType::Growl,
            PhonationType::Crying,
        ] {
            assert_eq!(phonation.to_string().parse::<PhonationType>(), Ok(phonation));
        }
        assert!("operatic".parse::<PhonationType>().is_err());
    }
}
