//! Synthesis engine abstraction layer
//!
//! A unified interface over interchangeable backends: the mock engine for
//! development, a generic cloud TTS API with a fixed voice catalog, and a
//! local GPU-backed model service. Engines advertise capabilities, report
//! availability from configuration alone, and turn a resolved parameter
//! vector plus text into one backend call.

pub mod cloud_tts;
pub mod local_model;
pub mod mock;
pub mod registry;
pub mod traits;
pub mod voice_map;

use std::sync::Arc;

use crate::config::{provider_source, BootstrapConfig, MemoryConfigStore, ProviderRecord};
use crate::core::error::Result;

pub use cloud_tts::{CloudTtsEngine, CLOUD_TTS_ENGINE_NAME};
pub use local_model::{LocalModelEngine, LOCAL_MODEL_ENGINE_NAME};
pub use mock::{MockEngine, MOCK_ENGINE_NAME};
pub use registry::{EngineRegistry, EngineStatus};
pub use traits::{EngineDescriptor, EngineRequest, SynthesisEngine, SynthesisResult};
pub use voice_map::{classify_voice, derive_speed, NamedVoiceCatalog, VoiceRole};

/// Build the registry with all built-in engines, wired to bootstrap
/// configuration and the mutable provider store.
pub fn init_engines(
    bootstrap: Arc<BootstrapConfig>,
    provider_store: Arc<MemoryConfigStore<ProviderRecord>>,
) -> Result<EngineRegistry> {
    let synthesis = &bootstrap.synthesis;
    let mut registry = EngineRegistry::new(synthesis.default_engine.clone());

    registry.register(Arc::new(MockEngine::new(synthesis.mock.clone())))?;

    let credentials = provider_source(
        provider_store,
        Arc::clone(&bootstrap),
        &synthesis.cloud_tts.provider,
    );
    registry.register(Arc::new(CloudTtsEngine::new(
        synthesis.cloud_tts.clone(),
        credentials,
    )))?;

    registry.register(Arc::new(LocalModelEngine::new(
        synthesis.local_model.clone(),
    )))?;

    Ok(registry)
}
