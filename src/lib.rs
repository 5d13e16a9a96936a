//! # Cantata-TTS - Parameter Resolution and Engine Dispatch
//!
//! Core synthesis layer for a singing/TTS platform: layered vocal parameter
//! resolution and dispatch across interchangeable synthesis backends.
//!
//! ## Features
//!
//! - **Layered Parameters**: Voice defaults overlaid with singing technique
//!   and emotion profiles into one bounded parameter vector
//! - **Multi-Engine Dispatch**: Unified API over a mock engine, a cloud TTS
//!   backend with named voices, and a local GPU-backed model service
//! - **Capability Degradation**: Continuous timbre parameters map onto a
//!   discrete named-voice catalog when the backend has no fine controls
//! - **Layered Configuration**: Database-style records take precedence over
//!   bootstrap YAML per record, with conservative disabled fallbacks
//! - **Bounded Calls**: Per-request timeout and cooperative cancellation,
//!   with every failure folded into a normal result object
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use std::sync::Arc;
//! use cantata_tts::config::{BootstrapConfig, MemoryConfigStore};
//! use cantata_tts::dispatch::{SynthesisJob, SynthesisService};
//! use cantata_tts::engine::init_engines;
//! use cantata_tts::params::builtin_catalog;
//!
//! let bootstrap = BootstrapConfig::load(Path::new("config/bootstrap.yaml"))?;
//! let band = bootstrap.synthesis.safety_band;
//! let registry = init_engines(Arc::new(bootstrap), Arc::new(MemoryConfigStore::new()))?;
//! let service = SynthesisService::new(Arc::new(builtin_catalog()), Arc::new(registry), band);
//!
//! let mut job = SynthesisJob::new("雪花飘落的夜晚", "aurora");
//! job.technique_id = Some("breathy-whisper".to_string());
//! job.emotion_id = Some("melancholy".to_string());
//! let result = service.synthesize(job).await;
//! ```

pub mod config;
pub mod core;
pub mod dispatch;
pub mod engine;
pub mod params;

pub use crate::config::{BootstrapConfig, EffectiveConfig, Provenance};
pub use crate::core::{Result, SynthesisError};
pub use crate::dispatch::{SynthesisJob, SynthesisService};
pub use crate::engine::{EngineRegistry, SynthesisEngine, SynthesisResult};
pub use crate::params::{ParameterResolver, ParameterVector, VoiceProfile};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
