//! Sitemap builder — every canonical URL across every entity and language.
//!
//! One `<url>` entry per (entity, language) pair so each language variant is
//! independently indexable, each annotated with its full cluster of
//! `xhtml:link` alternates and the run-wide `lastmod`. Entries are sorted by
//! `<loc>`; template extensions never appear.

use std::collections::BTreeMap;

use canon_core::config::SiteConfig;
use canon_core::locale::{LocaleCluster, SiteUrls, X_DEFAULT};
use canon_core::types::{DocumentRegistry, RunStamp};

/// One sitemap entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    pub loc: String,
    /// `(hreflang, href)` pairs, locale order then `x-default`.
    pub alternates: Vec<(String, String)>,
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn push_cluster(
    entries: &mut BTreeMap<String, SitemapEntry>,
    config: &SiteConfig,
    cluster: &LocaleCluster,
    include_fallback: bool,
) {
    let alternates = cluster.alternates(config);
    for url in cluster.urls().values() {
        entries.entry(url.clone()).or_insert_with(|| SitemapEntry {
            loc: url.clone(),
            alternates: alternates.clone(),
        });
    }
    if include_fallback {
        let url = cluster.fallback().to_string();
        entries.entry(url.clone()).or_insert_with(|| SitemapEntry {
            loc: url,
            alternates: alternates.clone(),
        });
    }
}

/// Collect the sitemap entries for the resolved site, keyed and sorted by
/// location. The fallback URL becomes its own entry only when the entity
/// declares an `x-default` variant (i.e. owns a rendered selector page).
pub fn collect_entries(
    config: &SiteConfig,
    documents: &DocumentRegistry,
    urls: &SiteUrls,
) -> Vec<SitemapEntry> {
    let mut entries: BTreeMap<String, SitemapEntry> = BTreeMap::new();

    for doc in &documents.documents {
        let Some(cluster) = urls.document(&doc.id.0) else {
            continue;
        };
        let owns_fallback = doc.variants.contains_key(X_DEFAULT);
        push_cluster(&mut entries, config, cluster, owns_fallback);
    }
    for (_, cluster) in urls.term_clusters() {
        push_cluster(&mut entries, config, cluster, false);
    }

    entries.into_values().collect()
}

/// Render the sitemap XML document.
pub fn build_sitemap(
    config: &SiteConfig,
    documents: &DocumentRegistry,
    urls: &SiteUrls,
    stamp: &RunStamp,
) -> String {
    let entries = collect_entries(config, documents, urls);
    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\" xmlns:xhtml=\"http://www.w3.org/1999/xhtml\">\n",
    );
    for entry in &entries {
        out.push_str("  <url>\n");
        out.push_str(&format!("    <loc>{}</loc>\n", xml_escape(&entry.loc)));
        out.push_str(&format!("    <lastmod>{}</lastmod>\n", xml_escape(&stamp.generated_at)));
        out.push_str("    <changefreq>monthly</changefreq>\n");
        for (hreflang, href) in &entry.alternates {
            out.push_str(&format!(
                "    <xhtml:link rel=\"alternate\" hreflang=\"{}\" href=\"{}\"/>\n",
                xml_escape(hreflang),
                xml_escape(href)
            ));
        }
        out.push_str("  </url>\n");
    }
    out.push_str("</urlset>\n");
    out
}
