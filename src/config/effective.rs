//! Effective configuration resolution
//!
//! Every external integration (synthesis provider, catalog client, ...) has
//! two possible sources for its configuration: operator-entered records in a
//! mutable store, and static bootstrap values. Resolution is all-or-nothing
//! at record granularity: a usable store record wins wholesale, otherwise the
//! bootstrap record is used, otherwise a conservative disabled record.
//! Nothing is cached; callers needing stability must snapshot the result.

use std::sync::{Arc, RwLock};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::bootstrap::{BootstrapConfig, ProviderBootstrap};
use crate::core::error::{Result, SynthesisError};

/// Distinguished key for single-instance integrations.
pub const DEFAULT_KEY: &str = "default";

/// Where a resolved configuration value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Operator-entered record from the mutable store.
    Database,
    /// Static bootstrap value.
    Bootstrap,
}

/// A resolved configuration value with its provenance tag.
#[derive(Debug, Clone)]
pub struct EffectiveConfig<T> {
    pub value: T,
    pub provenance: Provenance,
}

impl<T> EffectiveConfig<T> {
    pub fn database(value: T) -> Self {
        Self {
            value,
            provenance: Provenance::Database,
        }
    }

    pub fn bootstrap(value: T) -> Self {
        Self {
            value,
            provenance: Provenance::Bootstrap,
        }
    }
}

/// Record-level gates a stored configuration must pass before it wins over
/// bootstrap.
pub trait ConfigRecord: Clone {
    fn is_enabled(&self) -> bool;

    /// Whether this record may be selected at all. Defaults to the enabled
    /// flag; records carrying credentials additionally require them present.
    fn is_usable(&self) -> bool {
        self.is_enabled()
    }
}

/// Mutable-store accessor the resolver consumes. Storage itself is an
/// external collaborator; only the lookup shape is fixed here.
pub trait ConfigStore<T>: Send + Sync {
    fn find(&self, key: &str) -> Option<T>;

    /// Key of the record currently marked active, for multi-provider
    /// integrations. Single slot: at most one key is active at a time.
    fn active_key(&self) -> Option<String>;
}

/// Bootstrap accessor the resolver falls back to.
pub trait BootstrapRecords<T>: Send + Sync {
    fn bootstrap_record(&self, key: &str) -> Option<T>;
}

/// In-memory config store backed by a concurrent map plus a single
/// active-key slot. The active selection is one write, not a flag flipped
/// across every record.
pub struct MemoryConfigStore<T> {
    records: DashMap<String, T>,
    active: RwLock<Option<String>>,
}

impl<T: Clone> MemoryConfigStore<T> {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            active: RwLock::new(None),
        }
    }

    pub fn insert(&self, key: impl Into<String>, record: T) {
        self.records.insert(key.into(), record);
    }

    pub fn remove(&self, key: &str) -> Option<T> {
        self.records.remove(key).map(|(_, v)| v)
    }

    /// Mark `key` as the active record. The key must exist.
    pub fn set_active(&self, key: &str) -> Result<()> {
        if !self.records.contains_key(key) {
            return Err(SynthesisError::Validation {
                message: format!("cannot activate unknown config record: {}", key),
                field: Some("active".to_string()),
            });
        }
        *self.active.write().expect("active slot lock poisoned") = Some(key.to_string());
        Ok(())
    }

    pub fn clear_active(&self) {
        *self.active.write().expect("active slot lock poisoned") = None;
    }

    pub fn keys(&self) -> Vec<String> {
        self.records.iter().map(|e| e.key().clone()).collect()
    }
}

impl<T: Clone> Default for MemoryConfigStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync> ConfigStore<T> for MemoryConfigStore<T> {
    fn find(&self, key: &str) -> Option<T> {
        self.records.get(key).map(|e| e.value().clone())
    }

    fn active_key(&self) -> Option<String> {
        self.active.read().expect("active slot lock poisoned").clone()
    }
}

/// Resolves one effective configuration record per access.
pub struct ConfigSource<T> {
    store: Arc<dyn ConfigStore<T>>,
    bootstrap: Arc<dyn BootstrapRecords<T>>,
    /// Bootstrap key consulted when no store record is active.
    bootstrap_default_key: String,
    /// Conservative record returned when both sources are silent.
    fallback: T,
}

impl<T: ConfigRecord> ConfigSource<T> {
    pub fn new(
        store: Arc<dyn ConfigStore<T>>,
        bootstrap: Arc<dyn BootstrapRecords<T>>,
        bootstrap_default_key: impl Into<String>,
        fallback: T,
    ) -> Self {
        Self {
            store,
            bootstrap,
            bootstrap_default_key: bootstrap_default_key.into(),
            fallback,
        }
    }

    /// Resolve the effective record for `key`: usable store record first,
    /// bootstrap second, conservative fallback last. Never fails.
    pub fn resolve(&self, key: &str) -> EffectiveConfig<T> {
        if let Some(record) = self.store.find(key) {
            if record.is_usable() {
                debug!(key, "using database configuration");
                return EffectiveConfig::database(record);
            }
        }
        if let Some(record) = self.bootstrap.bootstrap_record(key) {
            debug!(key, "using bootstrap configuration");
            return EffectiveConfig::bootstrap(record);
        }
        warn!(key, "no configuration found, using conservative default");
        EffectiveConfig::bootstrap(self.fallback.clone())
    }

    /// Resolve the currently active record for multi-provider integrations:
    /// the store's active slot if that record is enabled, else the bootstrap
    /// record under the configured default key.
    pub fn resolve_active(&self) -> EffectiveConfig<T> {
        if let Some(key) = self.store.active_key() {
            if let Some(record) = self.store.find(&key) {
                if record.is_enabled() {
                    debug!(key, "using active database configuration");
                    return EffectiveConfig::database(record);
                }
            }
        }
        self.resolve_bootstrap_default()
    }

    fn resolve_bootstrap_default(&self) -> EffectiveConfig<T> {
        if let Some(record) = self.bootstrap.bootstrap_record(&self.bootstrap_default_key) {
            debug!(key = %self.bootstrap_default_key, "using bootstrap configuration");
            return EffectiveConfig::bootstrap(record);
        }
        warn!(
            key = %self.bootstrap_default_key,
            "no active or bootstrap configuration, using conservative default"
        );
        EffectiveConfig::bootstrap(self.fallback.clone())
    }
}

/// Credential configuration for one synthesis/LLM provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderRecord {
    pub provider: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_url: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

impl ProviderRecord {
    /// Conservative default: disabled, empty credentials.
    pub fn disabled(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            timeout_secs: default_timeout_secs(),
            ..Default::default()
        }
    }

    pub fn from_bootstrap(provider: &str, bootstrap: &ProviderBootstrap) -> Self {
        Self {
            provider: provider.to_string(),
            display_name: provider.to_string(),
            api_key: bootstrap.api_key.clone(),
            api_url: bootstrap.api_url.clone(),
            model: bootstrap.model.clone(),
            enabled: true,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ConfigRecord for ProviderRecord {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn is_usable(&self) -> bool {
        self.enabled && credential_present(&self.api_key)
    }
}

impl BootstrapRecords<ProviderRecord> for BootstrapConfig {
    fn bootstrap_record(&self, key: &str) -> Option<ProviderRecord> {
        self.provider(key)
            .map(|b| ProviderRecord::from_bootstrap(key, b))
    }
}

/// Whether a credential string is actually filled in. Unexpanded template
/// placeholders and obvious sample values count as absent.
pub fn credential_present(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && !trimmed.contains("${")
        && !trimmed.starts_with("your-")
        && trimmed != "changeme"
}

/// Build a provider config source over an in-memory store and bootstrap
/// config. `default_provider` names the bootstrap provider used when no
/// store record is active.
pub fn provider_source(
    store: Arc<MemoryConfigStore<ProviderRecord>>,
    bootstrap: Arc<BootstrapConfig>,
    default_provider: &str,
) -> ConfigSource<ProviderRecord> {
    let fallback = ProviderRecord::disabled(default_provider);
    ConfigSource::new(store, bootstrap, default_provider, fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bootstrap_with_openai() -> Arc<BootstrapConfig> {
        let mut config = BootstrapConfig::default();
        config.providers.insert(
            "openai".to_string(),
            ProviderBootstrap {
                api_key: "sk-bootstrap".to_string(),
                api_url: "https://api.openai.com/v1".to_string(),
                model: "tts-1".to_string(),
            },
        );
        Arc::new(config)
    }

    #[test]
    fn test_database_record_wins_when_usable() {
        let store = Arc::new(MemoryConfigStore::new());
        store.insert(
            "openai",
            ProviderRecord {
                provider: "openai".to_string(),
                api_key: "sk-database".to_string(),
                enabled: true,
                ..ProviderRecord::disabled("openai")
            },
        );
        let source = provider_source(store, bootstrap_with_openai(), "openai");

        let effective = source.resolve("openai");
        assert_eq!(effective.provenance, Provenance::Database);
        assert_eq!(effective.value.api_key, "sk-database");
    }

    #[test]
    fn test_bootstrap_fallback_when_record_absent() {
        let store = Arc::new(MemoryConfigStore::new());
        let source = provider_source(store, bootstrap_with_openai(), "openai");

        let effective = source.resolve("openai");
        assert_eq!(effective.provenance, Provenance::Bootstrap);
        assert_eq!(effective.value.api_key, "sk-bootstrap");
    }

    #[test]
    fn test_disabled_record_falls_back_wholesale() {
        // Record granularity: the disabled store record does not contribute
        // any field; the bootstrap record is used entirely.
        let store = Arc::new(MemoryConfigStore::new());
        store.insert(
            "openai",
            ProviderRecord {
                provider: "openai".to_string(),
                api_key: "sk-disabled".to_string(),
                api_url: "https://db.example.com".to_string(),
                enabled: false,
                ..ProviderRecord::disabled("openai")
            },
        );
        let source = provider_source(store, bootstrap_with_openai(), "openai");

        let effective = source.resolve("openai");
        assert_eq!(effective.provenance, Provenance::Bootstrap);
        assert_eq!(effective.value.api_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_missing_everywhere_yields_conservative_default() {
        let store: Arc<MemoryConfigStore<ProviderRecord>> = Arc::new(MemoryConfigStore::new());
        let source = provider_source(store, Arc::new(BootstrapConfig::default()), "openai");

        let effective = source.resolve("gemini");
        assert_eq!(effective.provenance, Provenance::Bootstrap);
        assert!(!effective.value.enabled);
        assert!(effective.value.api_key.is_empty());
    }

    #[test]
    fn test_active_slot_selects_single_record() {
        let store = Arc::new(MemoryConfigStore::new());
        for provider in ["openai", "gemini"] {
            store.insert(
                provider,
                ProviderRecord {
                    provider: provider.to_string(),
                    api_key: format!("sk-{}", provider),
                    enabled: true,
                    ..ProviderRecord::disabled(provider)
                },
            );
        }
        store.set_active("gemini").unwrap();
        let source = provider_source(store.clone(), bootstrap_with_openai(), "openai");

        let effective = source.resolve_active();
        assert_eq!(effective.provenance, Provenance::Database);
        assert_eq!(effective.value.provider, "gemini");

        // Re-pointing the slot needs no per-record flag flips.
        store.set_active("openai").unwrap();
        assert_eq!(source.resolve_active().value.provider, "openai");
    }

    #[test]
    fn test_active_slot_rejects_unknown_key() {
        let store: MemoryConfigStore<ProviderRecord> = MemoryConfigStore::new();
        assert!(store.set_active("nope").is_err());
    }

    #[test]
    fn test_no_active_slot_uses_bootstrap_default() {
        let store = Arc::new(MemoryConfigStore::new());
        let source = provider_source(store, bootstrap_with_openai(), "openai");

        let effective = source.resolve_active();
        assert_eq!(effective.provenance, Provenance::Bootstrap);
        assert_eq!(effective.value.provider, "openai");
    }

    #[test]
    fn test_credential_present() {
        assert!(credential_present("sk-live-abc123"));
        assert!(!credential_present(""));
        assert!(!credential_present("   "));
        assert!(!credential_present("${OPENAI_API_KEY}"));
        assert!(!credential_present("your-api-key-here"));
        assert!(!credential_present("changeme"));
    }
}
