pub mod clear;
pub mod index;
pub mod reconcile;
pub mod search;

pub use clear::ClearUseCase;
pub use index::{IndexStatus, IndexSummary, IndexUseCase, Progress, ProgressCallback};
pub use reconcile::{ReconcileSummary, ReconcileUseCase};
pub use search::SearchUseCase;
