//! Clean-URL normalization and per-entity locale clusters.
//!
//! Canonical URLs never carry the `.html` template extension. A stored path
//! ending in `index.html` (or in `/`) resolves to its directory. Two entities
//! resolving to the same canonical URL in the same language is a build-time
//! error, raised here — not deferred to the gate.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::{LocaleScheme, SiteConfig};
use crate::error::ResolveError;
use crate::types::{Document, DocumentRegistry, Slug, Term, TermRegistry};

/// The `hreflang` tag of the fallback alternate.
pub const X_DEFAULT: &str = "x-default";

/// The template extension that must never leak into a canonical URL.
pub const TEMPLATE_EXT: &str = ".html";

// ---------------------------------------------------------------------------
// Path normalization
// ---------------------------------------------------------------------------

/// Strip the template extension from a site-relative path.
///
/// `/en/glossary.html` → `/en/glossary`, `/en/index.html` → `/en/`,
/// `/index.html` → `/`. Extension-less paths pass through unchanged.
pub fn clean_path(path: &str) -> String {
    let Some(stem) = path.strip_suffix(TEMPLATE_EXT) else {
        return path.to_string();
    };
    match stem.strip_suffix("index") {
        // `…/index.html` resolves to the directory itself.
        Some(dir) if dir.is_empty() || dir.ends_with('/') => {
            if dir.is_empty() {
                "/".to_string()
            } else {
                dir.to_string()
            }
        }
        _ => stem.to_string(),
    }
}

/// Map a site-relative path to the output file it is served from.
///
/// `/` → `index.html`, `/en/` → `en/index.html`, `/en/glossary` →
/// `en/glossary.html`; paths already carrying the extension map verbatim.
pub fn file_path_for(path: &str) -> PathBuf {
    let rel = path.trim_start_matches('/');
    if rel.is_empty() || rel.ends_with('/') {
        return PathBuf::from(format!("{rel}index.html"));
    }
    if rel.ends_with(TEMPLATE_EXT) {
        return PathBuf::from(rel);
    }
    PathBuf::from(format!("{rel}{TEMPLATE_EXT}"))
}

/// Remove a leading locale path prefix (`/en/foo` → `/foo`) when the
/// negotiated scheme keeps language out of canonical paths.
fn strip_locale_prefix(config: &SiteConfig, path: &str) -> String {
    for locale in &config.locales {
        let prefix = format!("/{}", locale.path_prefix);
        if path == prefix {
            return "/".to_string();
        }
        if let Some(rest) = path.strip_prefix(&format!("{prefix}/")) {
            return format!("/{rest}");
        }
    }
    path.to_string()
}

// ---------------------------------------------------------------------------
// Term and document URLs
// ---------------------------------------------------------------------------

/// Site-relative canonical path of a term page in a given locale.
pub fn term_path(config: &SiteConfig, tag: &str, slug: &Slug) -> String {
    let locale = config
        .locale(tag)
        .unwrap_or_else(|| config.default_locale());
    match config.scheme {
        LocaleScheme::PathPrefix => {
            format!("/{}/{}/{}", locale.path_prefix, locale.term_segment, slug)
        }
        LocaleScheme::Negotiated => format!("/{}/{}", locale.term_segment, slug),
    }
}

/// On-disk location of a term page, relative to the site root. The file
/// layout always uses the per-language directory structure, independent of
/// the canonical scheme.
pub fn term_file_path(config: &SiteConfig, tag: &str, slug: &Slug) -> PathBuf {
    let locale = config
        .locale(tag)
        .unwrap_or_else(|| config.default_locale());
    PathBuf::from(locale.path_prefix.as_str())
        .join(locale.term_segment.as_str())
        .join(format!("{slug}{TEMPLATE_EXT}"))
}

/// Site-relative canonical path for a document variant's stored URL.
pub fn document_path(config: &SiteConfig, url: &str) -> String {
    let cleaned = clean_path(url);
    match config.scheme {
        LocaleScheme::PathPrefix => cleaned,
        LocaleScheme::Negotiated => strip_locale_prefix(config, &cleaned),
    }
}

// ---------------------------------------------------------------------------
// Locale clusters
// ---------------------------------------------------------------------------

/// Per-entity mapping from language tag to canonical URL, plus the designated
/// fallback URL advertised as `x-default`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleCluster {
    urls: BTreeMap<String, String>,
    fallback: String,
}

impl LocaleCluster {
    /// Canonical URL for a language, if the entity has that variant.
    pub fn url_for(&self, tag: &str) -> Option<&str> {
        self.urls.get(tag).map(String::as_str)
    }

    /// The `x-default` fallback URL.
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// All per-language URLs, keyed by tag (sorted).
    pub fn urls(&self) -> &BTreeMap<String, String> {
        &self.urls
    }

    /// Alternate links in emission order: configured locale order first, then
    /// the `x-default` fallback.
    pub fn alternates(&self, config: &SiteConfig) -> Vec<(String, String)> {
        let mut alts = Vec::with_capacity(self.urls.len() + 1);
        for locale in &config.locales {
            if let Some(url) = self.urls.get(&locale.tag) {
                alts.push((locale.tag.clone(), url.clone()));
            }
        }
        alts.push((X_DEFAULT.to_string(), self.fallback.clone()));
        alts
    }
}

/// Resolve the cluster for a term: one canonical URL per configured locale,
/// site root as the fallback.
pub fn resolve_term(config: &SiteConfig, term: &Term) -> LocaleCluster {
    let mut urls = BTreeMap::new();
    for locale in &config.locales {
        urls.insert(
            locale.tag.clone(),
            config.absolute(&term_path(config, &locale.tag, &term.slug)),
        );
    }
    LocaleCluster {
        urls,
        fallback: config.root_url(),
    }
}

/// Resolve the cluster for a document from its declared variant paths. An
/// `x-default` variant, when present, supplies the fallback URL; otherwise
/// the fallback is the site root.
pub fn resolve_document(config: &SiteConfig, doc: &Document) -> LocaleCluster {
    let mut urls = BTreeMap::new();
    let mut fallback = config.root_url();
    for (tag, variant) in &doc.variants {
        let url = config.absolute(&document_path(config, &variant.url));
        if tag == X_DEFAULT {
            fallback = url;
        } else {
            urls.insert(tag.clone(), url);
        }
    }
    LocaleCluster { urls, fallback }
}

// ---------------------------------------------------------------------------
// Whole-site resolution
// ---------------------------------------------------------------------------

/// The resolved URL universe: one cluster per entity, conflict-free.
#[derive(Debug, Clone)]
pub struct SiteUrls {
    documents: BTreeMap<String, LocaleCluster>,
    terms: BTreeMap<String, LocaleCluster>,
}

impl SiteUrls {
    pub fn document(&self, id: &str) -> Option<&LocaleCluster> {
        self.documents.get(id)
    }

    pub fn term(&self, id: &str) -> Option<&LocaleCluster> {
        self.terms.get(id)
    }

    /// Document clusters in id order.
    pub fn document_clusters(&self) -> impl Iterator<Item = (&str, &LocaleCluster)> {
        self.documents.iter().map(|(id, c)| (id.as_str(), c))
    }

    /// Term clusters in id order.
    pub fn term_clusters(&self) -> impl Iterator<Item = (&str, &LocaleCluster)> {
        self.terms.iter().map(|(id, c)| (id.as_str(), c))
    }
}

/// Resolve every entity and assert that no two of them share a canonical URL
/// in the same language. Raises immediately on the first conflict.
pub fn resolve_site(
    config: &SiteConfig,
    terms: &TermRegistry,
    documents: &DocumentRegistry,
) -> Result<SiteUrls, ResolveError> {
    let mut claimed: BTreeMap<(String, String), String> = BTreeMap::new();
    let mut claim = |lang: &str, url: &str, owner: &str| -> Result<(), ResolveError> {
        if let Some(first) = claimed.insert((lang.to_string(), url.to_string()), owner.to_string())
        {
            return Err(ResolveError::Conflict {
                lang: lang.to_string(),
                url: url.to_string(),
                first,
                second: owner.to_string(),
            });
        }
        Ok(())
    };

    let mut doc_clusters = BTreeMap::new();
    for doc in &documents.documents {
        let cluster = resolve_document(config, doc);
        for (tag, url) in cluster.urls() {
            claim(tag, url, &doc.id.0)?;
        }
        if doc.variants.contains_key(X_DEFAULT) {
            claim(X_DEFAULT, cluster.fallback(), &doc.id.0)?;
        }
        doc_clusters.insert(doc.id.0.clone(), cluster);
    }

    let mut term_clusters = BTreeMap::new();
    for term in &terms.terms {
        let cluster = resolve_term(config, term);
        for (tag, url) in cluster.urls() {
            claim(tag, url, &term.id.0)?;
        }
        term_clusters.insert(term.id.0.clone(), cluster);
    }

    Ok(SiteUrls {
        documents: doc_clusters,
        terms: term_clusters,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
