//! Error types for backend selection and graph preparation

/// Result type for selection and preparation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by [`crate::Session`] entry points
///
/// Per-candidate failures (a backend that would not start, an artifact that
/// would not load) are diagnostics, not errors: they consume a candidate and
/// selection moves on. Only running out of candidates reaches the caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Every candidate in the queue has been tried and discarded
    #[error("no backend is available")]
    ExhaustedCandidates,
}
