/// Errors from storage namespace operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The key is empty, too long, or contains characters outside `[A-Za-z0-9._-]`.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Writing the value would exceed the namespace quota.
    #[error("storage quota exceeded writing {key}: {needed} bytes needed, quota is {quota}")]
    QuotaExceeded { key: String, needed: u64, quota: u64 },

    /// The stored bytes are not valid UTF-8 text.
    #[error("stored value for {key} is not valid UTF-8")]
    InvalidUtf8 { key: String },

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Storage backend is read-only or otherwise unavailable.
    #[error("store is read-only")]
    ReadOnly,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
