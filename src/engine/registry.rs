//! Engine registry
//!
//! An explicit registration table from engine name to constructed instance,
//! built once at startup and read-only afterwards. Selection distinguishes
//! an unknown name (`EngineNotFound`, likely a typo) from a known engine
//! that is not usable yet (`EngineUnavailable`).

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::core::error::{Result, SynthesisError};

use super::traits::{EngineDescriptor, SynthesisEngine};

/// One row of the engine status listing.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    #[serde(flatten)]
    pub descriptor: EngineDescriptor,
    pub available: bool,
}

pub struct EngineRegistry {
    engines: HashMap<String, Arc<dyn SynthesisEngine>>,
    default_engine: String,
}

impl EngineRegistry {
    pub fn new(default_engine: impl Into<String>) -> Self {
        Self {
            engines: HashMap::new(),
            default_engine: default_engine.into(),
        }
    }

    /// Register an engine under its own name. Names are unique.
    pub fn register(&mut self, engine: Arc<dyn SynthesisEngine>) -> Result<()> {
        let name = engine.name().to_string();
        if self.engines.contains_key(&name) {
            return Err(SynthesisError::Validation {
                message: format!("engine already registered: {}", name),
                field: Some("name".to_string()),
            });
        }
        debug!(engine = %name, "registered synthesis engine");
        self.engines.insert(name, engine);
        Ok(())
    }

    pub fn default_engine(&self) -> &str {
        &self.default_engine
    }

    /// Select an engine by explicit name, or the configured default when
    /// none is given. Two-stage check: existence, then availability.
    pub fn select(&self, explicit: Option<&str>) -> Result<Arc<dyn SynthesisEngine>> {
        let name = explicit.unwrap_or(&self.default_engine);
        let engine = self
            .engines
            .get(name)
            .ok_or_else(|| SynthesisError::EngineNotFound {
                name: name.to_string(),
            })?;
        if !engine.is_available() {
            return Err(SynthesisError::EngineUnavailable {
                name: name.to_string(),
                reason: "not configured or disabled".to_string(),
            });
        }
        Ok(Arc::clone(engine))
    }

    /// Status of every registered engine with a live availability probe.
    /// Never fails; probing is a credential-presence check, not I/O.
    pub fn list(&self) -> Vec<EngineStatus> {
        let mut statuses: Vec<EngineStatus> = self
            .engines
            .values()
            .map(|engine| EngineStatus {
                descriptor: engine.descriptor(),
                available: engine.is_available(),
            })
            .collect();
        statuses.sort_by(|a, b| a.descriptor.name.cmp(&b.descriptor.name));
        statuses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockBootstrap;
    use crate::engine::mock::MockEngine;

    fn registry_with_mock(enabled: bool) -> EngineRegistry {
        let mut registry = EngineRegistry::new("mock");
        registry
            .register(Arc::new(MockEngine::new(MockBootstrap {
                enabled,
                delay_ms: 0,
            })))
            .unwrap();
        registry
    }

    #[test]
    fn test_select_default() {
        let registry = registry_with_mock(true);
        let engine = registry.select(None).unwrap();
        assert_eq!(engine.name(), "mock");
    }

    #[test]
    fn test_select_unknown_name_is_not_found() {
        let registry = registry_with_mock(true);
        let err = registry.select(Some("sovits")).err().unwrap();
        assert!(matches!(err, SynthesisError::EngineNotFound { .. }));
    }

    #[test]
    fn test_select_known_but_unavailable() {
        let registry = registry_with_mock(false);
        let err = registry.select(Some("mock")).err().unwrap();
        assert!(matches!(err, SynthesisError::EngineUnavailable { .. }));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = registry_with_mock(true);
        let err = registry
            .register(Arc::new(MockEngine::new(MockBootstrap {
                enabled: true,
                delay_ms: 0,
            })))
            .unwrap_err();
        assert!(matches!(err, SynthesisError::Validation { .. }));
    }

    #[test]
    fn test_list_reports_unavailable_engines() {
        let registry = registry_with_mock(false);
        let statuses = registry.list();
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].descriptor.name, "mock");
        assert!(!statuses[0].available);
    }
}
