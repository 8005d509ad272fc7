//! Error types for canon-gate.

use std::path::PathBuf;

use thiserror::Error;

/// Environmental failures while running the gate. Rule violations are not
/// errors — they are reported through `GateReport`.
#[derive(Debug, Error)]
pub enum GateError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`GateError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> GateError {
    GateError::Io {
        path: path.into(),
        source,
    }
}
