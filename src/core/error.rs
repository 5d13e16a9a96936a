//! Structured error handling for cantata-tts
//!
//! One hierarchical error type covers resolution, configuration and dispatch.
//! Fatal kinds (`VoiceNotFound`, `EngineNotFound`, `EngineUnavailable`)
//! short-circuit a request; everything that reaches the dispatch boundary is
//! converted into a failure `SynthesisResult`, never rethrown.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias with SynthesisError
pub type Result<T> = std::result::Result<T, SynthesisError>;

/// Main error type for cantata-tts
#[derive(Error, Debug, Clone)]
pub enum SynthesisError {
    /// The requested voice does not exist. Fatal: there is no sensible
    /// parameter default without a voice.
    #[error("voice not found: {voice_id}")]
    VoiceNotFound { voice_id: String },

    /// No engine registered under the requested name (likely a typo).
    #[error("engine not found: {name}")]
    EngineNotFound { name: String },

    /// Engine exists but is not usable right now (missing credentials,
    /// disabled in configuration). Distinct from `EngineNotFound` so callers
    /// can tell "typo" from "not configured yet".
    #[error("engine unavailable: {name} ({reason})")]
    EngineUnavailable { name: String, reason: String },

    /// The backend call itself failed (network error, non-2xx response).
    #[error("engine call failed ({engine}): {message}")]
    EngineCallFailed { engine: String, message: String },

    /// The caller cancelled the request before the engine finished.
    #[error("synthesis cancelled ({engine})")]
    Cancelled { engine: String },

    /// The bounded engine call exceeded its deadline.
    #[error("synthesis timed out ({engine}) after {elapsed_ms}ms")]
    Timeout { engine: String, elapsed_ms: u64 },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// Validation errors
    #[error("validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// I/O errors
    #[error("I/O error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
    },

    /// Internal/bug errors
    #[error("internal error: {message}")]
    Internal {
        message: String,
        location: Option<String>,
    },
}

impl SynthesisError {
    /// True for kinds that abort a request outright rather than being
    /// absorbed as a diagnostic note.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SynthesisError::Validation { .. })
    }
}

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add a simple message context
    fn context(self, msg: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| SynthesisError::Internal {
            message: format!("{}: {}", f(), e),
            location: None,
        })
    }

    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| SynthesisError::Internal {
            message: format!("{}: {}", msg.into(), e),
            location: None,
        })
    }
}

impl From<std::io::Error> for SynthesisError {
    fn from(err: std::io::Error) -> Self {
        SynthesisError::Io {
            message: err.to_string(),
            path: None,
        }
    }
}
