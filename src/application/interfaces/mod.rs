mod embedder;
mod snapshot_store;
mod splitter;
mod vector_store;

pub use embedder::*;
pub use snapshot_store::*;
pub use splitter::*;
pub use vector_store::*;
