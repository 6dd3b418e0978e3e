//! # Domain Layer
//!
//! Core models, the error taxonomy, and the pure services (path
//! filtering, identity derivation) that the application layer composes.
//! This layer is independent of external frameworks and infrastructure.

pub mod error;
pub mod models;
pub mod services;

pub use error::DomainError;
pub use models::*;
pub use services::{chunk_id, collection_name, should_visit, ExtensionAllowlist, IgnorePatternSet};
