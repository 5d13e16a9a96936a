//! Configuration: static bootstrap values and effective-record resolution
//! with database-over-bootstrap precedence.

pub mod bootstrap;
pub mod effective;

pub use bootstrap::{
    BootstrapConfig, CloudTtsBootstrap, LocalModelBootstrap, MockBootstrap, ProviderBootstrap,
    SynthesisBootstrap,
};
pub use effective::{
    credential_present, provider_source, BootstrapRecords, ConfigRecord, ConfigSource,
    ConfigStore, EffectiveConfig, MemoryConfigStore, Provenance, ProviderRecord, DEFAULT_KEY,
};
