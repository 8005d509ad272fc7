//! Error types for canon-renderer.

use thiserror::Error;

/// All errors that can arise from page rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// JSON serialization error (structured-data graph).
    #[error("structured data serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A page was requested for a variant the entity does not carry.
    #[error("entity '{id}' has no variant for language '{lang}'")]
    MissingVariant { id: String, lang: String },
}
