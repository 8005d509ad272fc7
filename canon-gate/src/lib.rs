//! # canon-gate
//!
//! Read-only consistency gate over a generated site tree.
//!
//! The gate re-reads the registries and the produced artifacts and asserts an
//! ordered sequence of check categories:
//!
//! 1. registry schema completeness and cross-registry doctrine agreement
//! 2. manifest references both source registries
//! 3. per-page HTML checks (lang, title, description, canonical, structured
//!    data, governance flags)
//! 4. global uniqueness (titles, descriptions, no internal `.html` links)
//! 5. registry-to-filesystem correspondence
//! 6. sitemap completeness
//!
//! The default mode aborts on the first violated category (fail-fast);
//! [`GateMode::Collect`] accumulates every violation for CI ergonomics.

pub mod checks;
pub mod error;
pub mod html;

use std::fmt;
use std::path::{Path, PathBuf};

pub use error::GateError;

/// Identifier of a gate rule, used in failure messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    RegistrySchema,
    ManifestRegistryRefs,
    PageLang,
    PageTitle,
    PageDescription,
    PageCanonical,
    PageStructuredData,
    PageFlags,
    DuplicateTitle,
    DuplicateDescription,
    InternalExtensionLink,
    MissingRenderedFile,
    SitemapExtension,
    SitemapMissingUrl,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rule::RegistrySchema => "registry-schema",
            Rule::ManifestRegistryRefs => "manifest-registry-refs",
            Rule::PageLang => "page-lang",
            Rule::PageTitle => "page-title",
            Rule::PageDescription => "page-description",
            Rule::PageCanonical => "page-canonical",
            Rule::PageStructuredData => "page-structured-data",
            Rule::PageFlags => "page-flags",
            Rule::DuplicateTitle => "duplicate-title",
            Rule::DuplicateDescription => "duplicate-description",
            Rule::InternalExtensionLink => "internal-extension-link",
            Rule::MissingRenderedFile => "missing-rendered-file",
            Rule::SitemapExtension => "sitemap-extension",
            Rule::SitemapMissingUrl => "sitemap-missing-url",
        };
        f.write_str(name)
    }
}

/// One violated invariant, with the offending artifact when known.
#[derive(Debug, Clone)]
pub struct ConsistencyViolation {
    pub rule: Rule,
    pub file: Option<PathBuf>,
    pub detail: String,
}

impl fmt::Display for ConsistencyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}: {} ({})", self.rule, self.detail, file.display()),
            None => write!(f, "{}: {}", self.rule, self.detail),
        }
    }
}

/// Whether the gate aborts on the first violated category or accumulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateMode {
    #[default]
    FailFast,
    Collect,
}

/// Result of a gate run.
#[derive(Debug, Clone, Default)]
pub struct GateReport {
    pub pages_checked: usize,
    pub violations: Vec<ConsistencyViolation>,
    /// Advisory findings (canonical path mismatches under the default
    /// policy). Never fail the run.
    pub warnings: Vec<String>,
}

impl GateReport {
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Run the gate over the site tree rooted at `site_root`.
pub fn run_gate(site_root: &Path, mode: GateMode) -> Result<GateReport, GateError> {
    checks::run(site_root, mode)
}
