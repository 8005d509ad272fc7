//! Site configuration — one immutable value constructed at startup and passed
//! explicitly to every component. Nothing in this workspace reads ambient
//! global state.

use url::Url;

use crate::error::RegistryError;
use crate::types::{DocumentRegistry, TermRegistry};

/// The only registry schema version this build understands.
pub const SUPPORTED_SCHEMA_VERSION: u32 = 1;

/// Published name of the manifest artifact, site-relative.
pub const MANIFEST_PATH: &str = "/canon-manifest.json";
/// Site-relative paths of the source registries.
pub const TERMS_REGISTRY_PATH: &str = "/data/terms.json";
pub const DOCUMENTS_REGISTRY_PATH: &str = "/data/documents.json";
/// `.well-known` mirrors for machine discovery.
pub const WELL_KNOWN_MANIFEST_PATH: &str = "/.well-known/canon-manifest.json";
pub const WELL_KNOWN_TERMS_PATH: &str = "/.well-known/canon-terms.json";
pub const WELL_KNOWN_DOCUMENTS_PATH: &str = "/.well-known/canon-documents.json";

/// One supported language of the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    /// BCP 47 tag as it appears in registry variants and `hreflang` links.
    pub tag: String,
    /// Path segment encoding the language (`en` → `/en/…`).
    pub path_prefix: String,
    /// Localized directory segment for term pages (`terms` / `termes`).
    pub term_segment: String,
    /// OpenGraph locale value (`en_US`, `fr_CA`).
    pub og_locale: String,
    /// Self-name shown on the language switch link.
    pub display_name: String,
}

/// Whether language is encoded in the canonical URL path or negotiated by the
/// host. One value per run; there are no parallel code paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocaleScheme {
    /// `/en/terms/foo` — language prefix is part of the canonical path.
    #[default]
    PathPrefix,
    /// `/terms/foo` — language resolved via host/header negotiation; canonical
    /// URLs carry no language prefix. File layout on disk is unchanged.
    Negotiated,
}

/// How hard a gate finding hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Fatal,
    Advisory,
}

/// Named policy for canonical-link verification: extension leakage is a
/// defect everywhere; an exact path mismatch may be downgraded to a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalPolicy {
    pub extension_leak: Severity,
    pub path_mismatch: Severity,
}

impl Default for CanonicalPolicy {
    fn default() -> Self {
        CanonicalPolicy {
            extension_leak: Severity::Fatal,
            path_mismatch: Severity::Advisory,
        }
    }
}

/// A fixed auxiliary discovery file listed in the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuxFile {
    pub name: &'static str,
    pub path: &'static str,
    pub media_type: &'static str,
}

/// Auxiliary discovery files, in manifest order. These are repo-authored, not
/// generated; the manifest advertises them for machine discovery.
pub const AUX_FILES: &[AuxFile] = &[
    AuxFile { name: "Sitemap", path: "/sitemap.xml", media_type: "application/xml" },
    AuxFile { name: "Robots", path: "/robots.txt", media_type: "text/plain" },
    AuxFile { name: "Humans", path: "/humans.txt", media_type: "text/plain" },
    AuxFile { name: "LLMs discovery", path: "/llms.txt", media_type: "text/plain" },
    AuxFile { name: "Governance", path: "/GOVERNANCE.md", media_type: "text/markdown" },
    AuxFile { name: "Content policy", path: "/CONTENT-POLICY.md", media_type: "text/markdown" },
    AuxFile { name: "Copyright", path: "/COPYRIGHT.md", media_type: "text/markdown" },
];

/// Process-wide immutable site configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Absolute origin with no trailing slash (`https://canon.example.org`).
    pub origin: String,
    pub site_name: String,
    pub site_description: String,
    pub publisher_name: String,
    pub publisher_url: String,
    /// Cache-busting query value appended to asset references.
    pub asset_version: String,
    /// Site-relative path of the shared social preview image.
    pub og_image_path: String,
    /// Character cap for meta descriptions before word-boundary truncation.
    pub description_cap: usize,
    pub locales: Vec<Locale>,
    pub scheme: LocaleScheme,
    pub canonical_policy: CanonicalPolicy,
}

impl SiteConfig {
    /// Build the run configuration from validated registry headers. The origin
    /// comes from the registries; everything else is fixed configuration.
    pub fn from_registries(
        terms: &TermRegistry,
        documents: &DocumentRegistry,
    ) -> Result<Self, RegistryError> {
        if terms.site_origin != documents.site_origin {
            return Err(RegistryError::Schema {
                field: "siteOrigin".to_string(),
                detail: format!(
                    "registries disagree: '{}' vs '{}'",
                    terms.site_origin, documents.site_origin
                ),
            });
        }
        Self::with_origin(&terms.site_origin)
    }

    /// Build a configuration for an explicit origin. Used directly by tests.
    pub fn with_origin(origin: &str) -> Result<Self, RegistryError> {
        let parsed = Url::parse(origin).map_err(|e| RegistryError::Schema {
            field: "siteOrigin".to_string(),
            detail: format!("'{origin}' is not an absolute URL: {e}"),
        })?;
        if parsed.scheme() != "https" && parsed.scheme() != "http" {
            return Err(RegistryError::Schema {
                field: "siteOrigin".to_string(),
                detail: format!("'{origin}' must use http or https"),
            });
        }
        Ok(SiteConfig {
            origin: origin.trim_end_matches('/').to_string(),
            site_name: "Canon Reference".to_string(),
            site_description:
                "Doctrinal reference for versioned terminology and governed documents (non-operational)."
                    .to_string(),
            publisher_name: "Canon Editors".to_string(),
            publisher_url: format!("{}/", origin.trim_end_matches('/')),
            asset_version: "20260227-1".to_string(),
            og_image_path: "/assets/og.png".to_string(),
            description_cap: 175,
            locales: default_locales(),
            scheme: LocaleScheme::default(),
            canonical_policy: CanonicalPolicy::default(),
        })
    }

    /// Look a locale up by tag.
    pub fn locale(&self, tag: &str) -> Option<&Locale> {
        self.locales.iter().find(|l| l.tag == tag)
    }

    /// The first configured locale is the default.
    pub fn default_locale(&self) -> &Locale {
        &self.locales[0]
    }

    /// Absolute URL for a site-relative path.
    pub fn absolute(&self, path: &str) -> String {
        format!("{}{}", self.origin, path)
    }

    /// The site root URL (with trailing slash).
    pub fn root_url(&self) -> String {
        format!("{}/", self.origin)
    }
}

/// The default locale table: English plus Canadian French.
pub fn default_locales() -> Vec<Locale> {
    vec![
        Locale {
            tag: "en".to_string(),
            path_prefix: "en".to_string(),
            term_segment: "terms".to_string(),
            og_locale: "en_US".to_string(),
            display_name: "English".to_string(),
        },
        Locale {
            tag: "fr-CA".to_string(),
            path_prefix: "fr".to_string(),
            term_segment: "termes".to_string(),
            og_locale: "fr_CA".to_string(),
            display_name: "Français".to_string(),
        },
    ]
}
