//! # codeindex
//!
//! A semantic code indexer: walks a codebase, splits files into
//! AST-aligned chunks, embeds them, and stores the vectors for similarity
//! search — with incremental reconciliation so re-running after a few
//! edits only touches what changed.
//!
//! ## Architecture
//!
//! The crate follows the same domain-driven layering throughout:
//!
//! - `domain`: models, the error taxonomy, and pure services (path
//!   filtering, content-derived identity)
//! - `application`: ports (`interfaces`), ambient config, the indexing /
//!   search / reconcile / clear use cases, and the `Orchestrator` facade
//! - `connector`: adapters implementing those ports (tree-sitter
//!   splitting, a mock embedder, in-memory and DuckDB vector stores, a
//!   JSON snapshot store)

pub mod application;
pub mod connector;
pub mod domain;

pub use application::{IndexerConfig, Orchestrator};
pub use domain::DomainError;
