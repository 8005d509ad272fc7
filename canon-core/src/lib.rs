//! Canon core library — domain types, registry loading, URL resolution, errors.
//!
//! Public API surface:
//! - [`types`] — newtypes and registry structs
//! - [`config`] — [`SiteConfig`], locale table, policies
//! - [`registry`] — load / validate
//! - [`locale`] — clean URLs, [`LocaleCluster`], whole-site resolution
//! - [`error`] — [`RegistryError`], [`ResolveError`]

pub mod config;
pub mod error;
pub mod locale;
pub mod registry;
pub mod types;

pub use config::{CanonicalPolicy, Locale, LocaleScheme, Severity, SiteConfig};
pub use error::{RegistryError, ResolveError};
pub use locale::{LocaleCluster, SiteUrls};
pub use types::{
    Classification, DocId, DocRole, DocVariant, Document, DocumentRegistry, Operability, RunStamp,
    Slug, Term, TermId, TermRegistry, TermStatus, TermVariant,
};
