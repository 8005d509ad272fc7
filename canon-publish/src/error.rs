//! Error types for canon-publish.

use std::path::PathBuf;

use thiserror::Error;

use canon_core::error::{RegistryError, ResolveError};
use canon_renderer::RenderError;

/// All errors that can arise from a build run.
#[derive(Debug, Error)]
pub enum PublishError {
    /// An error from registry loading or validation.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// A canonical URL conflict detected during resolution.
    #[error("resolution error: {0}")]
    Resolve(#[from] ResolveError),

    /// An error from the rendering engine.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// JSON serialization error (manifest).
    #[error("manifest JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`PublishError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> PublishError {
    PublishError::Io {
        path: path.into(),
        source,
    }
}
