//! Registry loading and validation.
//!
//! # Input layout
//!
//! ```text
//! <site>/
//!   data/
//!     terms.json       (term registry)
//!     documents.json   (document registry)
//! ```
//!
//! Loading is read-only. Validation is all-or-nothing: the first schema
//! violation aborts the run with an error naming the entity and field.

use std::path::{Path, PathBuf};

use chrono::DateTime;

use crate::config::{SiteConfig, SUPPORTED_SCHEMA_VERSION};
use crate::error::RegistryError;
use crate::locale::X_DEFAULT;
use crate::types::{DocumentRegistry, TermRegistry};

/// File name of the term registry under `data/`.
pub const TERMS_FILE: &str = "terms.json";
/// File name of the document registry under `data/`.
pub const DOCUMENTS_FILE: &str = "documents.json";

/// `<site>/data/` — pure, no I/O.
pub fn data_dir(site_root: &Path) -> PathBuf {
    site_root.join("data")
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, RegistryError> {
    if !path.exists() {
        return Err(RegistryError::RegistryNotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| RegistryError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load the term registry from an explicit path.
pub fn load_terms_at(path: &Path) -> Result<TermRegistry, RegistryError> {
    load_json(path)
}

/// Load the document registry from an explicit path.
pub fn load_documents_at(path: &Path) -> Result<DocumentRegistry, RegistryError> {
    load_json(path)
}

/// Load both registries from `<site>/data/`.
pub fn load_registries_at(
    site_root: &Path,
) -> Result<(TermRegistry, DocumentRegistry), RegistryError> {
    let dir = data_dir(site_root);
    let terms = load_terms_at(&dir.join(TERMS_FILE))?;
    let documents = load_documents_at(&dir.join(DOCUMENTS_FILE))?;
    Ok((terms, documents))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn check_schema_version(which: &str, version: u32) -> Result<(), RegistryError> {
    if version != SUPPORTED_SCHEMA_VERSION {
        return Err(RegistryError::Schema {
            field: "schemaVersion".to_string(),
            detail: format!(
                "{which} registry declares version {version}, supported version is {SUPPORTED_SCHEMA_VERSION}"
            ),
        });
    }
    Ok(())
}

fn check_generated_at(which: &str, value: &str) -> Result<(), RegistryError> {
    DateTime::parse_from_rfc3339(value).map_err(|e| RegistryError::Schema {
        field: "generatedAt".to_string(),
        detail: format!("{which} registry value '{value}' is not RFC 3339: {e}"),
    })?;
    Ok(())
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
}

fn is_valid_variant_url(url: &str) -> bool {
    url.starts_with('/')
        && url
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_' | '.'))
}

/// Validate both registries against the schema and the configured locale
/// table. Loading succeeds only on fully well-formed registries. `related`
/// term references are not checked here: unresolvable ids are dropped at
/// render time, never a hard failure.
pub fn validate(
    terms: &TermRegistry,
    documents: &DocumentRegistry,
    config: &SiteConfig,
) -> Result<(), RegistryError> {
    check_schema_version("terms", terms.schema_version)?;
    check_schema_version("documents", documents.schema_version)?;

    if terms.doctrine_version != documents.doctrine_version {
        return Err(RegistryError::DoctrineVersionMismatch {
            terms: terms.doctrine_version.clone(),
            documents: documents.doctrine_version.clone(),
        });
    }

    check_generated_at("terms", &terms.generated_at)?;
    check_generated_at("documents", &documents.generated_at)?;

    let mut seen_ids = std::collections::BTreeSet::new();
    let mut seen_slugs = std::collections::BTreeSet::new();
    for term in &terms.terms {
        if !is_valid_id(&term.id.0) {
            return Err(RegistryError::Schema {
                field: "terms[].id".to_string(),
                detail: format!("'{}' contains characters outside [A-Za-z0-9._:-]", term.id),
            });
        }
        if !seen_ids.insert(term.id.0.as_str()) {
            return Err(RegistryError::Duplicate {
                what: "term id",
                value: term.id.0.clone(),
            });
        }
        if !is_valid_slug(&term.slug.0) {
            return Err(RegistryError::Schema {
                field: "terms[].slug".to_string(),
                detail: format!("'{}' contains characters outside [a-z0-9-]", term.slug),
            });
        }
        if !seen_slugs.insert(term.slug.0.as_str()) {
            return Err(RegistryError::Duplicate {
                what: "term slug",
                value: term.slug.0.clone(),
            });
        }
        if term.term_code.is_empty() {
            return Err(RegistryError::Schema {
                field: "terms[].termCode".to_string(),
                detail: format!("term '{}' has an empty term code", term.id),
            });
        }
        for locale in &config.locales {
            if !term.variants.contains_key(&locale.tag) {
                return Err(RegistryError::MissingVariant {
                    id: term.id.0.clone(),
                    lang: locale.tag.clone(),
                });
            }
        }
    }

    let mut seen_doc_ids = std::collections::BTreeSet::new();
    for doc in &documents.documents {
        if !is_valid_id(&doc.id.0) {
            return Err(RegistryError::Schema {
                field: "documents[].id".to_string(),
                detail: format!("'{}' contains characters outside [A-Za-z0-9._:-]", doc.id),
            });
        }
        if !seen_doc_ids.insert(doc.id.0.as_str()) {
            return Err(RegistryError::Duplicate {
                what: "document id",
                value: doc.id.0.clone(),
            });
        }
        for locale in &config.locales {
            if !doc.variants.contains_key(&locale.tag) {
                return Err(RegistryError::MissingVariant {
                    id: doc.id.0.clone(),
                    lang: locale.tag.clone(),
                });
            }
        }
        for (tag, variant) in &doc.variants {
            if tag != X_DEFAULT && config.locale(tag).is_none() {
                return Err(RegistryError::Schema {
                    field: "documents[].variants".to_string(),
                    detail: format!("document '{}' declares unknown language '{tag}'", doc.id),
                });
            }
            if !is_valid_variant_url(&variant.url) {
                return Err(RegistryError::Schema {
                    field: "documents[].variants[].url".to_string(),
                    detail: format!(
                        "document '{}' variant '{tag}' URL '{}' must be site-relative",
                        doc.id, variant.url
                    ),
                });
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
