//! Request dispatch

pub mod service;

pub use service::{SynthesisJob, SynthesisService};
