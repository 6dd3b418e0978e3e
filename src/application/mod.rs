//! # Application Layer
//!
//! Ports (`interfaces`), ambient configuration, the four use cases, and
//! the `Orchestrator` facade that composes them for callers.

pub mod config;
pub mod interfaces;
pub mod orchestrator;
pub mod use_cases;

pub use config::IndexerConfig;
pub use orchestrator::Orchestrator;
pub use use_cases::*;
