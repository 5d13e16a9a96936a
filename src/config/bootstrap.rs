//! Static bootstrap configuration
//!
//! File/environment-sourced defaults that back every integration when no
//! operator-entered record exists in the mutable store. Loaded once at
//! startup from YAML and validated at construction; explicit structs with
//! named fields and documented defaults, no builder scattering.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SynthesisError};
use crate::params::SafetyBand;

/// Top-level bootstrap configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Synthesis engine settings.
    #[serde(default)]
    pub synthesis: SynthesisBootstrap,
    /// Credential bootstrap per external provider, keyed by provider name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderBootstrap>,
}

impl BootstrapConfig {
    /// Load and validate bootstrap configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SynthesisError::Io {
            message: format!("failed to read bootstrap file: {}", e),
            path: Some(path.to_path_buf()),
        })?;
        let config: BootstrapConfig =
            serde_yaml::from_str(&content).map_err(|e| SynthesisError::Config {
                message: format!("failed to parse bootstrap YAML: {}", e),
                path: Some(path.to_path_buf()),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate invariants once; a validated config is never re-checked.
    pub fn validate(&self) -> Result<()> {
        if self.synthesis.default_engine.is_empty() {
            return Err(SynthesisError::Config {
                message: "synthesis.default_engine must not be empty".to_string(),
                path: None,
            });
        }
        let band = &self.synthesis.safety_band;
        if !(band.min > 0.0 && band.min < band.max) {
            return Err(SynthesisError::Config {
                message: format!(
                    "synthesis.safety_band must satisfy 0 < min < max, got [{}, {}]",
                    band.min, band.max
                ),
                path: None,
            });
        }
        if self.synthesis.cloud_tts.timeout_secs == 0 || self.synthesis.local_model.timeout_secs == 0
        {
            return Err(SynthesisError::Config {
                message: "engine timeouts must be positive".to_string(),
                path: None,
            });
        }
        Ok(())
    }

    /// Bootstrap provider record for `key`, if one is configured.
    pub fn provider(&self, key: &str) -> Option<&ProviderBootstrap> {
        self.providers.get(key)
    }
}

/// Synthesis engine bootstrap settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisBootstrap {
    /// Engine used when a request names none: mock, cloud-tts, local-model.
    #[serde(default = "default_engine_name")]
    pub default_engine: String,
    /// Safety band every float multiplier is clamped into before an engine
    /// sees it.
    #[serde(default)]
    pub safety_band: SafetyBand,
    /// Mock engine settings (development/testing).
    #[serde(default)]
    pub mock: MockBootstrap,
    /// Generic cloud TTS engine settings.
    #[serde(default)]
    pub cloud_tts: CloudTtsBootstrap,
    /// Local GPU-backed model service settings.
    #[serde(default)]
    pub local_model: LocalModelBootstrap,
}

impl Default for SynthesisBootstrap {
    fn default() -> Self {
        Self {
            default_engine: default_engine_name(),
            safety_band: SafetyBand::default(),
            mock: MockBootstrap::default(),
            cloud_tts: CloudTtsBootstrap::default(),
            local_model: LocalModelBootstrap::default(),
        }
    }
}

fn default_engine_name() -> String {
    "mock".to_string()
}

/// Mock engine bootstrap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockBootstrap {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Artificial processing delay in milliseconds.
    #[serde(default = "default_mock_delay")]
    pub delay_ms: u64,
}

impl Default for MockBootstrap {
    fn default() -> Self {
        Self {
            enabled: true,
            delay_ms: default_mock_delay(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_mock_delay() -> u64 {
    100
}

/// Cloud TTS engine bootstrap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudTtsBootstrap {
    /// Provider key looked up through the config source for credentials.
    #[serde(default = "default_cloud_provider")]
    pub provider: String,
    /// Backend synthesis model name.
    #[serde(default = "default_cloud_model")]
    pub model: String,
    /// Directory synthesized audio files are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Requested response audio format.
    #[serde(default = "default_cloud_format")]
    pub response_format: String,
    /// Output sample rate reported by the backend.
    #[serde(default = "default_cloud_sample_rate")]
    pub sample_rate: u32,
    /// Outbound call deadline.
    #[serde(default = "default_cloud_timeout")]
    pub timeout_secs: u64,
}

impl Default for CloudTtsBootstrap {
    fn default() -> Self {
        Self {
            provider: default_cloud_provider(),
            model: default_cloud_model(),
            output_dir: default_output_dir(),
            response_format: default_cloud_format(),
            sample_rate: default_cloud_sample_rate(),
            timeout_secs: default_cloud_timeout(),
        }
    }
}

fn default_cloud_provider() -> String {
    "openai".to_string()
}

fn default_cloud_model() -> String {
    "tts-1".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("target/audio")
}

fn default_cloud_format() -> String {
    "mp3".to_string()
}

fn default_cloud_sample_rate() -> u32 {
    24000
}

fn default_cloud_timeout() -> u64 {
    60
}

/// Local model service bootstrap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalModelBootstrap {
    #[serde(default)]
    pub enabled: bool,
    /// Base URL of the local synthesis service.
    #[serde(default = "default_local_api_url")]
    pub api_url: String,
    /// Directory holding voice model files.
    #[serde(default = "default_local_models_path")]
    pub models_path: PathBuf,
    /// Output sample rate of the local service.
    #[serde(default = "default_local_sample_rate")]
    pub sample_rate: u32,
    /// Outbound call deadline; GPU-backed synthesis can run long.
    #[serde(default = "default_local_timeout")]
    pub timeout_secs: u64,
}

impl Default for LocalModelBootstrap {
    fn default() -> Self {
        Self {
            enabled: false,
            api_url: default_local_api_url(),
            models_path: default_local_models_path(),
            sample_rate: default_local_sample_rate(),
            timeout_secs: default_local_timeout(),
        }
    }
}

fn default_local_api_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_local_models_path() -> PathBuf {
    PathBuf::from("/models/sovits")
}

fn default_local_sample_rate() -> u32 {
    44100
}

fn default_local_timeout() -> u64 {
    300
}

/// Bootstrap credentials for one external provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderBootstrap {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_url: String,
    #[serde(default)]
    pub model: String,
}
