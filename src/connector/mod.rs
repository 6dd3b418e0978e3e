//! # Connector Layer
//!
//! Concrete adapters implementing the `application::interfaces` ports:
//! splitting (tree-sitter AST, recursive character fallback), embedding
//! (a deterministic mock; real provider clients plug in the same way),
//! vector storage (in-memory and embedded DuckDB), and snapshot
//! persistence (flat JSON on disk).

pub mod adapter;

pub use adapter::*;
