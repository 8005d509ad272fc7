//! The ordered check categories of the consistency gate.
//!
//! Category order is fixed; under [`GateMode::FailFast`] the first category
//! with violations ends the run and later categories are not attempted.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use canon_core::config::{
    Severity, SiteConfig, DOCUMENTS_REGISTRY_PATH, MANIFEST_PATH, TERMS_REGISTRY_PATH,
};
use canon_core::locale::{self, TEMPLATE_EXT};
use canon_core::registry;
use canon_core::types::{DocumentRegistry, TermRegistry};

use crate::error::{io_err, GateError};
use crate::html::{self, PageFacts};
use crate::{ConsistencyViolation, GateMode, GateReport, Rule};

/// Structured-data types that must never appear on a doctrinal page.
const FORBIDDEN_NODE_TYPES: &[&str] = &[
    "Article",
    "NewsArticle",
    "BlogPosting",
    "TechArticle",
    "ScholarlyArticle",
    "CreativeWork",
];

fn violation(rule: Rule, file: Option<&Path>, detail: impl Into<String>) -> ConsistencyViolation {
    ConsistencyViolation {
        rule,
        file: file.map(Path::to_path_buf),
        detail: detail.into(),
    }
}

// ---------------------------------------------------------------------------
// Page collection
// ---------------------------------------------------------------------------

fn collect_html_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), GateError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            collect_html_files(&path, out)?;
        } else if path.extension().and_then(|s| s.to_str()) == Some("html") {
            out.push(path);
        }
    }
    Ok(())
}

fn load_pages(site_root: &Path) -> Result<Vec<PageFacts>, GateError> {
    let mut files = Vec::new();
    collect_html_files(site_root, &mut files)?;
    files.sort();

    let mut pages = Vec::with_capacity(files.len());
    for path in files {
        // The error page sits outside the canonical URL universe.
        if path.file_name().and_then(|n| n.to_str()) == Some("404.html") {
            continue;
        }
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        let rel = path.strip_prefix(site_root).unwrap_or(&path).to_path_buf();
        pages.push(html::extract(rel, &contents));
    }
    Ok(pages)
}

fn unix_rel(rel_path: &Path) -> String {
    rel_path.to_string_lossy().replace('\\', "/")
}

/// Canonical URL a page is expected to declare, derived from its file path.
fn expected_canonical(config: &SiteConfig, rel_path: &Path) -> String {
    let site_relative = format!("/{}", unix_rel(rel_path));
    config.absolute(&locale::document_path(config, &site_relative))
}

fn is_term_page(config: &SiteConfig, rel_path: &Path) -> bool {
    let unix = unix_rel(rel_path);
    config
        .locales
        .iter()
        .any(|l| unix.starts_with(&format!("{}/{}/", l.path_prefix, l.term_segment)))
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// (a) Registry schema completeness and cross-registry agreement.
fn check_registries(
    site_root: &Path,
) -> Result<(TermRegistry, DocumentRegistry, SiteConfig), ConsistencyViolation> {
    let make = |detail: String| violation(Rule::RegistrySchema, None, detail);
    let (terms, documents) =
        registry::load_registries_at(site_root).map_err(|e| make(e.to_string()))?;
    let config =
        SiteConfig::from_registries(&terms, &documents).map_err(|e| make(e.to_string()))?;
    registry::validate(&terms, &documents, &config).map_err(|e| make(e.to_string()))?;
    Ok((terms, documents, config))
}

/// (b) The manifest references both source registries.
fn check_manifest(site_root: &Path, config: &SiteConfig) -> Vec<ConsistencyViolation> {
    let rel = PathBuf::from(MANIFEST_PATH.trim_start_matches('/'));
    let path = site_root.join(&rel);
    let contents = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(_) => {
            return vec![violation(
                Rule::ManifestRegistryRefs,
                Some(&rel),
                "manifest is missing",
            )]
        }
    };
    let parsed: serde_json::Value = match serde_json::from_str(&contents) {
        Ok(v) => v,
        Err(e) => {
            return vec![violation(
                Rule::ManifestRegistryRefs,
                Some(&rel),
                format!("manifest is not valid JSON: {e}"),
            )]
        }
    };

    let content_urls: BTreeSet<&str> = parsed["distribution"]
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|e| e["contentUrl"].as_str())
                .collect()
        })
        .unwrap_or_default();

    let mut violations = Vec::new();
    for registry_path in [TERMS_REGISTRY_PATH, DOCUMENTS_REGISTRY_PATH] {
        let url = config.absolute(registry_path);
        if !content_urls.contains(url.as_str()) {
            violations.push(violation(
                Rule::ManifestRegistryRefs,
                Some(&rel),
                format!("manifest does not reference {url}"),
            ));
        }
    }
    violations
}

/// (c) Per-page HTML checks.
fn check_pages(
    pages: &[PageFacts],
    config: &SiteConfig,
    doctrine_version: &str,
    warnings: &mut Vec<String>,
) -> Vec<ConsistencyViolation> {
    let mut violations = Vec::new();

    for page in pages {
        let rel = Some(page.rel_path.as_path());

        if page.lang.is_none() {
            violations.push(violation(Rule::PageLang, rel, "missing <html lang>"));
        }
        if page.title.is_none() {
            violations.push(violation(Rule::PageTitle, rel, "missing or empty <title>"));
        }
        if page.description.is_none() {
            violations.push(violation(
                Rule::PageDescription,
                rel,
                "missing or empty meta description",
            ));
        }

        match &page.canonical {
            None => violations.push(violation(Rule::PageCanonical, rel, "missing canonical link")),
            Some(canonical) => {
                if canonical.contains(TEMPLATE_EXT) {
                    let detail = format!("canonical contains {TEMPLATE_EXT}: {canonical}");
                    match config.canonical_policy.extension_leak {
                        Severity::Fatal => {
                            violations.push(violation(Rule::PageCanonical, rel, detail))
                        }
                        Severity::Advisory => warnings.push(format!(
                            "{}: {detail}",
                            page.rel_path.display()
                        )),
                    }
                }
                if !canonical.starts_with(&config.origin) {
                    warnings.push(format!(
                        "{}: canonical not on {}: {canonical}",
                        page.rel_path.display(),
                        config.origin
                    ));
                }
                let expected = expected_canonical(config, &page.rel_path);
                if canonical != &expected {
                    let detail =
                        format!("canonical is {canonical}, path-derived expectation is {expected}");
                    match config.canonical_policy.path_mismatch {
                        Severity::Fatal => {
                            violations.push(violation(Rule::PageCanonical, rel, detail))
                        }
                        Severity::Advisory => {
                            tracing::warn!("{}: {detail}", page.rel_path.display());
                            warnings.push(format!("{}: {detail}", page.rel_path.display()));
                        }
                    }
                }
            }
        }

        violations.extend(check_structured_data(page));
        violations.extend(check_flags(page, config, doctrine_version));
    }

    violations
}

fn check_structured_data(page: &PageFacts) -> Vec<ConsistencyViolation> {
    let rel = Some(page.rel_path.as_path());
    let Some(raw) = &page.jsonld else {
        return vec![violation(
            Rule::PageStructuredData,
            rel,
            "missing JSON-LD structured data",
        )];
    };
    let parsed: serde_json::Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            return vec![violation(
                Rule::PageStructuredData,
                rel,
                format!("structured data is not valid JSON: {e}"),
            )]
        }
    };

    let mut violations = Vec::new();
    let nodes = parsed["@graph"].as_array().cloned().unwrap_or_default();
    if nodes.is_empty() {
        violations.push(violation(
            Rule::PageStructuredData,
            rel,
            "structured data graph is empty",
        ));
    }
    for node in &nodes {
        let node_type = node["@type"].as_str().unwrap_or_default();
        if FORBIDDEN_NODE_TYPES.contains(&node_type) {
            violations.push(violation(
                Rule::PageStructuredData,
                rel,
                format!("forbidden node type '{node_type}' on a doctrinal page"),
            ));
        }
        // Governance metadata lives in canon:* meta flags only; a keywords
        // property on a page node is the legacy mixed encoding.
        if node_type == "WebPage" && node.get("keywords").is_some() {
            violations.push(violation(
                Rule::PageStructuredData,
                rel,
                "governance keywords encoded on a WebPage node",
            ));
        }
    }
    violations
}

fn check_flags(
    page: &PageFacts,
    config: &SiteConfig,
    doctrine_version: &str,
) -> Vec<ConsistencyViolation> {
    let rel = Some(page.rel_path.as_path());
    let mut violations = Vec::new();

    let required: &[(&str, &str)] = &[
        ("canon:status", "doctrinal"),
        ("canon:operability", "non-operational"),
        ("canon:doctrine-version", doctrine_version),
    ];
    for (name, expected) in required {
        match page.meta.get(*name) {
            None => violations.push(violation(
                Rule::PageFlags,
                rel,
                format!("missing governance flag {name}"),
            )),
            Some(actual) if actual != expected => violations.push(violation(
                Rule::PageFlags,
                rel,
                format!("flag {name} is '{actual}', required '{expected}'"),
            )),
            Some(_) => {}
        }
    }

    if is_term_page(config, &page.rel_path) {
        for name in ["canon:entity-id", "canon:term-code"] {
            if page.meta.get(name).map_or(true, String::is_empty) {
                violations.push(violation(
                    Rule::PageFlags,
                    rel,
                    format!("term page missing {name}"),
                ));
            }
        }
        if page.meta.get("canon:entity-type").map(String::as_str) != Some("DefinedTerm") {
            violations.push(violation(
                Rule::PageFlags,
                rel,
                "term page missing canon:entity-type=DefinedTerm",
            ));
        }
    } else if page.meta.get("canon:doc-id").map_or(true, String::is_empty) {
        violations.push(violation(Rule::PageFlags, rel, "page missing canon:doc-id"));
    }

    violations
}

/// (d) Global uniqueness and internal-link hygiene.
fn check_uniqueness(pages: &[PageFacts]) -> Vec<ConsistencyViolation> {
    let mut violations = Vec::new();

    let mut titles: BTreeMap<&str, &Path> = BTreeMap::new();
    let mut descriptions: BTreeMap<&str, &Path> = BTreeMap::new();
    for page in pages {
        if let Some(title) = &page.title {
            if let Some(first) = titles.insert(title.as_str(), page.rel_path.as_path()) {
                violations.push(violation(
                    Rule::DuplicateTitle,
                    Some(&page.rel_path),
                    format!("title '{title}' already used by {}", first.display()),
                ));
            }
        }
        if let Some(description) = &page.description {
            if let Some(first) = descriptions.insert(description.as_str(), page.rel_path.as_path()) {
                violations.push(violation(
                    Rule::DuplicateDescription,
                    Some(&page.rel_path),
                    format!("description already used by {}", first.display()),
                ));
            }
        }
    }

    for page in pages {
        for href in &page.internal_links {
            if href.contains(TEMPLATE_EXT) {
                violations.push(violation(
                    Rule::InternalExtensionLink,
                    Some(&page.rel_path),
                    format!("internal link carries {TEMPLATE_EXT}: {href}"),
                ));
            }
        }
    }

    violations
}

/// (e) Every registry-declared URL maps to a rendered file.
fn check_coverage(
    site_root: &Path,
    config: &SiteConfig,
    terms: &TermRegistry,
    documents: &DocumentRegistry,
) -> Vec<ConsistencyViolation> {
    let mut violations = Vec::new();

    for doc in &documents.documents {
        for (tag, variant) in &doc.variants {
            let rel = locale::file_path_for(&variant.url);
            if !site_root.join(&rel).exists() {
                violations.push(violation(
                    Rule::MissingRenderedFile,
                    Some(&rel),
                    format!(
                        "document '{}' variant '{tag}' URL '{}' has no rendered file",
                        doc.id, variant.url
                    ),
                ));
            }
        }
    }
    for term in &terms.terms {
        for locale_cfg in &config.locales {
            let rel = locale::term_file_path(config, &locale_cfg.tag, &term.slug);
            if !site_root.join(&rel).exists() {
                violations.push(violation(
                    Rule::MissingRenderedFile,
                    Some(&rel),
                    format!(
                        "term '{}' language '{}' has no rendered file",
                        term.id, locale_cfg.tag
                    ),
                ));
            }
        }
    }

    violations
}

/// (f) Sitemap completeness.
fn check_sitemap(
    site_root: &Path,
    config: &SiteConfig,
    pages: &[PageFacts],
) -> Vec<ConsistencyViolation> {
    let rel = PathBuf::from("sitemap.xml");
    let path = site_root.join(&rel);
    let contents = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(_) => {
            return vec![violation(
                Rule::SitemapMissingUrl,
                Some(&rel),
                "missing sitemap.xml",
            )]
        }
    };

    let mut violations = Vec::new();
    if contents.contains(TEMPLATE_EXT) {
        violations.push(violation(
            Rule::SitemapExtension,
            Some(&rel),
            format!("sitemap contains {TEMPLATE_EXT} URLs"),
        ));
    }

    let listed: BTreeSet<&str> = contents
        .split("<loc>")
        .skip(1)
        .filter_map(|chunk| chunk.split("</loc>").next())
        .collect();
    let missing: Vec<String> = pages
        .iter()
        .map(|p| expected_canonical(config, &p.rel_path))
        .filter(|url| !listed.contains(url.as_str()))
        .collect();
    if !missing.is_empty() {
        violations.push(violation(
            Rule::SitemapMissingUrl,
            Some(&rel),
            format!("sitemap missing {} URL(s): {}", missing.len(), missing.join(", ")),
        ));
    }

    violations
}

// ---------------------------------------------------------------------------
// Orchestration
// ---------------------------------------------------------------------------

/// Run every category in order against the tree at `site_root`.
pub(crate) fn run(site_root: &Path, mode: GateMode) -> Result<GateReport, GateError> {
    let mut report = GateReport::default();

    // (a) — nothing else can run without validated registries.
    let (terms, documents, config) = match check_registries(site_root) {
        Ok(parts) => parts,
        Err(violation) => {
            report.violations.push(violation);
            return Ok(report);
        }
    };
    let doctrine_version = terms.doctrine_version.clone();

    let pages = load_pages(site_root)?;
    report.pages_checked = pages.len();

    // Categories are evaluated one at a time: under fail-fast, a violated
    // category ends the run before the next is attempted.
    let stop = |report: &mut GateReport, found: Vec<ConsistencyViolation>| -> bool {
        if found.is_empty() {
            return false;
        }
        report.violations.extend(found);
        mode == GateMode::FailFast
    };

    let found = check_manifest(site_root, &config);
    if stop(&mut report, found) {
        return Ok(report);
    }
    let found = check_pages(&pages, &config, &doctrine_version, &mut report.warnings);
    if stop(&mut report, found) {
        return Ok(report);
    }
    let found = check_uniqueness(&pages);
    if stop(&mut report, found) {
        return Ok(report);
    }
    let found = check_coverage(site_root, &config, &terms, &documents);
    if stop(&mut report, found) {
        return Ok(report);
    }
    let found = check_sitemap(site_root, &config, &pages);
    if stop(&mut report, found) {
        return Ok(report);
    }

    Ok(report)
}
