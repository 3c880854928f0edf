//! Error taxonomy for the enforcement pipeline.

use thiserror::Error;

/// Pipeline-level errors.
///
/// Only [`Error::StreamOpen`] and [`Error::InvalidConfig`] are fatal to a
/// session. Everything that can go wrong inside the per-frame loop is
/// recovered at its call boundary: an unavailable perception backend yields
/// empty results, a malformed detection is dropped on its own, and a failed
/// collaborator call is logged while the loop continues.
#[derive(Debug, Error)]
pub enum Error {
    /// A perception backend (detector or OCR) failed to initialize and is
    /// disabled for the session.
    #[error("perception backend unavailable: {0}")]
    PerceptionUnavailable(String),

    /// A single detection could not be used (bbox outside the frame,
    /// non-positive size). The rest of the frame is processed normally.
    #[error("malformed detection: {reason}")]
    MalformedDetection { reason: String },

    /// An external collaborator call (OCR read, screenshot write,
    /// downstream notification) failed.
    #[error("collaborator failure during {stage}: {message}")]
    CollaboratorIo {
        stage: &'static str,
        message: String,
    },

    /// The video stream for a session could not be opened.
    #[error("cannot open stream {source_name}: {reason}")]
    StreamOpen {
        source_name: String,
        reason: String,
    },

    /// Camera configuration failed basic numeric sanity checks.
    #[error("invalid camera configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Whether this error aborts the session. Per-frame failures degrade
    /// into fewer results instead.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::StreamOpen { .. } | Error::InvalidConfig(_))
    }
}
