use thiserror::Error;

/// The crate's error taxonomy. Every fallible operation in `application`
/// and `connector` eventually resolves to one of these variants; the
/// Orchestrator is responsible for ensuring nothing else escapes it.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("parse error: {0}")]
    ParseError(String),

    #[error("embedding error: {0}")]
    EmbeddingError(String),

    #[error("storage error: {0}")]
    StorageError(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("i/o error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),

    /// Malformed or contradictory configuration supplied at construction
    /// time (bad glob pattern, zero chunk size, overlap >= chunk size).
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// A transient failure talking to an external dependency (embedder,
    /// vector store). `retryable` tells the caller whether retrying the
    /// same call with backoff is expected to help.
    #[error("resource error: {message}")]
    ResourceError { message: String, retryable: bool },

    #[error("authentication error: {0}")]
    AuthError(String),

    /// A caller-imposed or provider-imposed limit was exceeded (token
    /// budget, request quota).
    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    /// A vector store collection's dimension or distance metric does not
    /// match what the active embedder requires.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A non-fatal splitter warning (e.g. a node forced past the target
    /// chunk size because it could not be split further without breaking
    /// a line). Surfaced to callers, never aborts the pipeline.
    #[error("parse warning: {0}")]
    ParseWarning(String),

    /// A single file was skipped during indexing (binary content, oversize
    /// chunk, read failure) without aborting the batch it belongs to.
    #[error("skipped file {path}: {reason}")]
    SkippedFile { path: String, reason: String },

    /// The operation observed a cancellation request at an I/O suspension
    /// point and unwound cooperatively.
    #[error("operation cancelled")]
    CancelRequested,
}

impl DomainError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageError(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    pub fn embedding(msg: impl Into<String>) -> Self {
        Self::EmbeddingError(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::AlreadyExists(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn resource(msg: impl Into<String>, retryable: bool) -> Self {
        Self::ResourceError {
            message: msg.into(),
            retryable,
        }
    }

    pub fn schema_mismatch(msg: impl Into<String>) -> Self {
        Self::SchemaMismatch(msg.into())
    }

    pub fn skipped_file(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SkippedFile {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists(_))
    }

    pub fn is_storage_error(&self) -> bool {
        matches!(self, Self::StorageError(_))
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ResourceError { retryable: true, .. })
    }

    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::CancelRequested)
    }
}
