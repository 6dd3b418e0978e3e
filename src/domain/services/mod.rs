pub mod identity;
pub mod path_filter;

pub use identity::{chunk_id, collection_name};
pub use path_filter::{should_visit, ExtensionAllowlist, IgnorePatternSet};
