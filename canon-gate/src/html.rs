//! Head-metadata extraction from generated pages.
//!
//! The gate verifies markup this workspace itself generated, so anchored
//! regular expressions over the known tag shapes are the extraction
//! contract; there is no general-purpose HTML parsing here.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

static LANG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<html\s+lang="([^"]*)""#).expect("lang regex"));
static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<title>([^<]*)</title>").expect("title regex"));
static META: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta\s+(?:name|property)="([^"]+)"\s+content="([^"]*)""#).expect("meta regex")
});
static CANONICAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<link\s+rel="canonical"\s+href="([^"]*)""#).expect("canonical regex")
});
static ALTERNATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<link\s+rel="alternate"\s+hreflang="([^"]+)"\s+href="([^"]*)""#)
        .expect("alternate regex")
});
static JSONLD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<script type="application/ld\+json">(.*?)</script>"#).expect("jsonld regex")
});
static ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<a\s[^>]*href="([^"]*)""#).expect("anchor regex"));

/// Everything the gate needs to know about one rendered page.
#[derive(Debug, Clone)]
pub struct PageFacts {
    /// Path relative to the site root.
    pub rel_path: PathBuf,
    pub lang: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub canonical: Option<String>,
    /// Raw JSON-LD block, if present.
    pub jsonld: Option<String>,
    /// All `<meta name=…>` / `<meta property=…>` values, first occurrence wins.
    pub meta: BTreeMap<String, String>,
    /// `(hreflang, href)` pairs of the alternate links.
    pub alternates: Vec<(String, String)>,
    /// `<a href>` targets that are not external schemes or fragments.
    pub internal_links: Vec<String>,
}

fn is_internal(href: &str) -> bool {
    !(href.starts_with("http://")
        || href.starts_with("https://")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with('#'))
}

/// Extract the gate-relevant facts from one page.
pub fn extract(rel_path: PathBuf, html: &str) -> PageFacts {
    let mut meta = BTreeMap::new();
    for cap in META.captures_iter(html) {
        meta.entry(cap[1].to_string()).or_insert_with(|| cap[2].to_string());
    }

    let description = meta.get("description").cloned().filter(|d| !d.is_empty());

    PageFacts {
        rel_path,
        lang: LANG
            .captures(html)
            .map(|c| c[1].to_string())
            .filter(|l| !l.is_empty()),
        title: TITLE
            .captures(html)
            .map(|c| c[1].trim().to_string())
            .filter(|t| !t.is_empty()),
        description,
        canonical: CANONICAL.captures(html).map(|c| c[1].to_string()),
        jsonld: JSONLD.captures(html).map(|c| c[1].to_string()),
        meta,
        alternates: ALTERNATE
            .captures_iter(html)
            .map(|c| (c[1].to_string(), c[2].to_string()))
            .collect(),
        internal_links: ANCHOR
            .captures_iter(html)
            .map(|c| c[1].to_string())
            .filter(|href| is_internal(href))
            .collect(),
    }
}
