//! Error types for canon-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while loading or validating the registries.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Underlying I/O failure (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The registry JSON file did not exist at the expected path.
    #[error("registry not found at {path}")]
    RegistryNotFound { path: PathBuf },

    /// JSON parse error on load — serde_json names the offending field and line.
    #[error("failed to parse registry at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A required registry field is missing or malformed.
    #[error("registry schema error in field `{field}`: {detail}")]
    Schema { field: String, detail: String },

    /// The two registries disagree on the doctrine version.
    #[error("doctrine version mismatch: terms registry declares {terms}, documents registry declares {documents}")]
    DoctrineVersionMismatch { terms: String, documents: String },

    /// An identifier or slug that must be globally unique appears twice.
    #[error("duplicate {what}: '{value}'")]
    Duplicate { what: &'static str, value: String },

    /// An entity is missing its variant for a configured language.
    #[error("entity '{id}' has no variant for required language '{lang}'")]
    MissingVariant { id: String, lang: String },
}

/// Errors from canonical URL resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Two entities resolve to the same canonical URL in the same language.
    #[error("canonical URL conflict for language '{lang}': '{first}' and '{second}' both resolve to {url}")]
    Conflict {
        lang: String,
        url: String,
        first: String,
        second: String,
    },
}
