//! Error types for backend operations

/// Result type for backend operations
pub type Result<T> = std::result::Result<T, BackendError>;

/// Errors that can occur while initializing a backend or loading and
/// running a graph artifact
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Backend failed to start
    #[error("backend initialization failed: {0}")]
    InitFailed(String),

    /// No usable execution device was found for a device-backed backend
    #[error("no execution device available: {0}")]
    DeviceUnavailable(String),

    /// Backend name is not one of the known variants
    #[error("unknown backend: {0}")]
    UnknownBackend(String),

    /// Graph descriptor file does not exist at the artifact location
    #[error("graph descriptor not found: {}", .0.display())]
    DescriptorMissing(std::path::PathBuf),

    /// Graph descriptor could not be parsed
    #[error("invalid graph descriptor: {0}")]
    DescriptorParse(#[from] serde_json::Error),

    /// I/O error while reading artifact files
    #[error("artifact i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Weight file length is not a whole number of f32 values
    #[error("weight data is {len} bytes, not a multiple of {elem} bytes")]
    WeightSizeMismatch { len: usize, elem: usize },

    /// Graph operation references buffers that do not exist or do not line up
    #[error("invalid graph op at index {index}: {reason}")]
    InvalidOp { index: usize, reason: String },

    /// Buffer write with the wrong number of elements
    #[error("buffer size mismatch: expected {expected}, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Runner was asked to run or expose buffers before a successful load
    #[error("no graph loaded")]
    NotLoaded,
}

impl BackendError {
    /// Create an initialization error
    pub fn init_failed(msg: impl Into<String>) -> Self {
        Self::InitFailed(msg.into())
    }

    /// Create an invalid-op error
    pub fn invalid_op(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidOp {
            index,
            reason: reason.into(),
        }
    }
}
