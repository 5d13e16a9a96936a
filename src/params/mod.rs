//! Synthesis parameters: the bounded parameter vector, the profile presets
//! layered into it, and the three-layer resolver.

pub mod profiles;
pub mod resolver;
pub mod vector;

pub use profiles::{
    builtin_catalog, EmotionParams, EmotionProfile, MemoryProfileCatalog, ModelRef,
    ProfileLookup, TechniqueParams, TechniqueProfile, VoiceProfile,
};
pub use resolver::ParameterResolver;
pub use vector::{clamp_scale, ParameterVector, PhonationType, SafetyBand};
