//! Core infrastructure: error taxonomy shared by every module.

pub mod error;

pub use error::{Result, ResultExt, SynthesisError};
