//! Error types for trace ingestion.

use thiserror::Error;

/// Errors that abort a trace load. The session keeps the previously loaded
/// trace whenever one of these surfaces.
#[derive(Debug, Error)]
pub enum TraceError {
    /// Payload decoded but is not a recorded trace (unparseable text,
    /// or no frame sequence)
    #[error("Malformed trace: {0}")]
    MalformedTrace(String),

    /// Payload is neither the embedded encoding nor plain trace text
    #[error("Unknown file kind: {0}")]
    UnknownFileKind(String),
}

impl TraceError {
    /// Creates a malformed-trace error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedTrace(msg.into())
    }

    /// Creates an unknown-file-kind error.
    pub fn unknown_file(kind: impl Into<String>) -> Self {
        Self::UnknownFileKind(kind.into())
    }
}
