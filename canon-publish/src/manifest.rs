//! Manifest builder — the dataset-shaped index of every publishable artifact.
//!
//! One `DataDownload` entry per (entity, language) page, per source registry,
//! per `.well-known` mirror, and per fixed auxiliary discovery file. The
//! `distribution` list is sorted by `contentUrl`; struct field order is the
//! serialization order.

use std::collections::BTreeMap;

use serde::Serialize;

use canon_core::config::{
    AUX_FILES, DOCUMENTS_REGISTRY_PATH, MANIFEST_PATH, TERMS_REGISTRY_PATH,
    WELL_KNOWN_DOCUMENTS_PATH, WELL_KNOWN_MANIFEST_PATH, WELL_KNOWN_TERMS_PATH,
};
use canon_core::locale::{SiteUrls, X_DEFAULT};
use canon_renderer::jsonld::NodeRef;
use canon_renderer::SiteModel;

/// Language annotation of a manifest entry: a single tag, or every site
/// language for selector pages.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum LanguageSpec {
    One(String),
    Many(Vec<String>),
}

/// One publishable artifact.
#[derive(Debug, Clone, Serialize)]
pub struct ManifestEntry {
    #[serde(rename = "@type")]
    pub node_type: &'static str,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "contentUrl")]
    pub content_url: String,
    #[serde(rename = "encodingFormat")]
    pub encoding_format: String,
    #[serde(rename = "inLanguage", skip_serializing_if = "Option::is_none")]
    pub in_language: Option<LanguageSpec>,
    pub identifier: String,
    pub keywords: Vec<String>,
}

/// The aggregate manifest document.
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    #[serde(rename = "@context")]
    pub context: (String, BTreeMap<String, String>),
    #[serde(rename = "@type")]
    pub node_type: &'static str,
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub url: String,
    pub identifier: &'static str,
    pub version: String,
    #[serde(rename = "dateModified")]
    pub date_modified: String,
    #[serde(rename = "inLanguage")]
    pub in_language: Vec<String>,
    pub creator: NodeRef,
    pub license: String,
    pub distribution: Vec<ManifestEntry>,
}

fn doctrine_keyword(version: &str) -> String {
    format!("doctrine:{version}")
}

fn page_entry(
    name: &str,
    description: &str,
    content_url: &str,
    in_language: LanguageSpec,
    identifier: &str,
    keywords: Vec<String>,
) -> ManifestEntry {
    ManifestEntry {
        node_type: "DataDownload",
        name: name.to_string(),
        description: Some(description.to_string()),
        content_url: content_url.to_string(),
        encoding_format: "text/html".to_string(),
        in_language: Some(in_language),
        identifier: identifier.to_string(),
        keywords,
    }
}

fn machine_entry(name: &str, path: &str, media_type: &str, version: &str, origin: &str) -> ManifestEntry {
    ManifestEntry {
        node_type: "DataDownload",
        name: name.to_string(),
        description: None,
        content_url: format!("{origin}{path}"),
        encoding_format: media_type.to_string(),
        in_language: None,
        identifier: path.to_string(),
        keywords: vec![
            "informative".to_string(),
            "doctrinal".to_string(),
            "non-operational".to_string(),
            doctrine_keyword(version),
        ],
    }
}

/// Build the manifest for the resolved site.
pub fn build_manifest(model: &SiteModel<'_>, urls: &SiteUrls) -> Manifest {
    let config = model.config;
    let version = &model.stamp.doctrine_version;
    let all_tags: Vec<String> = config.locales.iter().map(|l| l.tag.clone()).collect();
    let mut dist: Vec<ManifestEntry> = Vec::new();

    for doc in &model.documents.documents {
        let Some(cluster) = urls.document(&doc.id.0) else {
            continue;
        };
        for (tag, variant) in &doc.variants {
            let (content_url, in_language) = if tag == X_DEFAULT {
                (cluster.fallback(), LanguageSpec::Many(all_tags.clone()))
            } else {
                let Some(url) = cluster.url_for(tag) else {
                    continue;
                };
                (url, LanguageSpec::One(tag.clone()))
            };
            dist.push(page_entry(
                &variant.title,
                &variant.description,
                content_url,
                in_language,
                &doc.id.0,
                vec![
                    doc.role.to_string(),
                    doc.classification.to_string(),
                    "doctrinal".to_string(),
                    doc.operability.to_string(),
                    doctrine_keyword(version),
                ],
            ));
        }
    }

    for term in &model.terms.terms {
        let Some(cluster) = urls.term(&term.id.0) else {
            continue;
        };
        for locale in &config.locales {
            let Some(variant) = term.variants.get(&locale.tag) else {
                continue;
            };
            let Some(url) = cluster.url_for(&locale.tag) else {
                continue;
            };
            dist.push(page_entry(
                &variant.label,
                &variant.definition,
                url,
                LanguageSpec::One(locale.tag.clone()),
                &term.id.0,
                vec![
                    term.term_code.clone(),
                    term.classification.to_string(),
                    term.status.to_string(),
                    "DefinedTerm".to_string(),
                    "doctrinal".to_string(),
                    doctrine_keyword(version),
                ],
            ));
        }
    }

    let machine_files: &[(&str, &str, &str)] = &[
        ("Canonical manifest", MANIFEST_PATH, "application/ld+json"),
        ("Terms registry", TERMS_REGISTRY_PATH, "application/json"),
        ("Documents registry", DOCUMENTS_REGISTRY_PATH, "application/json"),
        ("Well-known manifest", WELL_KNOWN_MANIFEST_PATH, "application/ld+json"),
        ("Well-known terms registry", WELL_KNOWN_TERMS_PATH, "application/json"),
        ("Well-known documents registry", WELL_KNOWN_DOCUMENTS_PATH, "application/json"),
    ];
    for (name, path, media_type) in machine_files {
        dist.push(machine_entry(name, path, media_type, version, &config.origin));
    }
    for aux in AUX_FILES {
        dist.push(machine_entry(aux.name, aux.path, aux.media_type, version, &config.origin));
    }

    // Sorted by content URL for determinism.
    dist.sort_by(|a, b| a.content_url.cmp(&b.content_url));

    let mut ns = BTreeMap::new();
    ns.insert("canon".to_string(), format!("{}/ns#", config.origin));

    Manifest {
        context: ("https://schema.org".to_string(), ns),
        node_type: "Dataset",
        id: format!("{}{}#dataset", config.origin, MANIFEST_PATH),
        name: format!("{} canonical manifest", config.site_name),
        description: format!(
            "Machine-readable index of public doctrinal artifacts (non-operational) for {}.",
            config.site_name
        ),
        url: config.absolute(MANIFEST_PATH),
        identifier: "canon-manifest",
        version: version.clone(),
        date_modified: model.stamp.generated_at.clone(),
        in_language: all_tags,
        creator: NodeRef::new(format!("{}/#publisher", config.origin)),
        license: config.absolute("/COPYRIGHT.md"),
        distribution: dist,
    }
}

/// Pretty JSON with a trailing newline, as published.
pub fn to_json(manifest: &Manifest) -> Result<String, serde_json::Error> {
    Ok(format!("{}\n", serde_json::to_string_pretty(manifest)?))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use canon_core::config::SiteConfig;
    use canon_core::locale::resolve_site;
    use canon_core::types::{
        Classification, DocId, DocRole, DocVariant, Document, DocumentRegistry, Operability,
        RunStamp, Slug, Term, TermId, TermRegistry, TermStatus, TermVariant,
    };

    use super::*;

    fn fixture() -> (SiteConfig, RunStamp, TermRegistry, DocumentRegistry) {
        let config = SiteConfig::with_origin("https://canon.example.org").expect("config");
        let stamp = RunStamp {
            doctrine_version: "2.1".to_string(),
            generated_at: "2026-02-27T00:00:00Z".to_string(),
        };
        let mut variants = BTreeMap::new();
        for (tag, label) in [("en", "Scope"), ("fr-CA", "Portée")] {
            variants.insert(
                tag.to_string(),
                TermVariant {
                    label: label.to_string(),
                    definition: format!("{label} definition."),
                },
            );
        }
        let terms = TermRegistry {
            schema_version: 1,
            doctrine_version: "2.1".to_string(),
            generated_at: "2026-02-27T00:00:00Z".to_string(),
            site_origin: config.origin.clone(),
            terms: vec![Term {
                id: TermId::from("CAN-TERM-001"),
                term_code: "SC".to_string(),
                slug: Slug::from("scope"),
                classification: Classification::Normative,
                status: TermStatus::Canonical,
                related: vec![],
                variants,
            }],
        };
        let mut doc_variants = BTreeMap::new();
        doc_variants.insert(
            "en".to_string(),
            DocVariant {
                url: "/en/glossary".to_string(),
                title: "Glossary".to_string(),
                description: "Definitions.".to_string(),
            },
        );
        doc_variants.insert(
            "fr-CA".to_string(),
            DocVariant {
                url: "/fr/glossaire".to_string(),
                title: "Glossaire".to_string(),
                description: "Définitions.".to_string(),
            },
        );
        let documents = DocumentRegistry {
            schema_version: 1,
            doctrine_version: "2.1".to_string(),
            generated_at: "2026-02-27T00:00:00Z".to_string(),
            site_origin: config.origin.clone(),
            documents: vec![Document {
                id: DocId::from("CAN-DOC-GLOSSARY"),
                role: DocRole::Glossary,
                classification: Classification::Normative,
                operability: Operability::NonOperational,
                variants: doc_variants,
            }],
        };
        (config, stamp, terms, documents)
    }

    #[test]
    fn distribution_is_sorted_by_content_url() {
        let (config, stamp, terms, documents) = fixture();
        let urls = resolve_site(&config, &terms, &documents).expect("resolve");
        let model = SiteModel::new(&config, &stamp, &terms, &documents);
        let manifest = build_manifest(&model, &urls);
        let urls_list: Vec<&str> = manifest
            .distribution
            .iter()
            .map(|e| e.content_url.as_str())
            .collect();
        let mut sorted = urls_list.clone();
        sorted.sort();
        assert_eq!(urls_list, sorted);
    }

    #[test]
    fn manifest_references_both_registries() {
        let (config, stamp, terms, documents) = fixture();
        let urls = resolve_site(&config, &terms, &documents).expect("resolve");
        let model = SiteModel::new(&config, &stamp, &terms, &documents);
        let manifest = build_manifest(&model, &urls);
        let content_urls: Vec<&str> = manifest
            .distribution
            .iter()
            .map(|e| e.content_url.as_str())
            .collect();
        assert!(content_urls.contains(&"https://canon.example.org/data/terms.json"));
        assert!(content_urls.contains(&"https://canon.example.org/data/documents.json"));
    }

    #[test]
    fn every_entity_language_pair_has_an_entry() {
        let (config, stamp, terms, documents) = fixture();
        let urls = resolve_site(&config, &terms, &documents).expect("resolve");
        let model = SiteModel::new(&config, &stamp, &terms, &documents);
        let manifest = build_manifest(&model, &urls);
        for url in [
            "https://canon.example.org/en/terms/scope",
            "https://canon.example.org/fr/termes/scope",
            "https://canon.example.org/en/glossary",
            "https://canon.example.org/fr/glossaire",
        ] {
            assert!(
                manifest.distribution.iter().any(|e| e.content_url == url),
                "missing manifest entry for {url}"
            );
        }
    }

    #[test]
    fn manifest_is_stamped_with_run_values() {
        let (config, stamp, terms, documents) = fixture();
        let urls = resolve_site(&config, &terms, &documents).expect("resolve");
        let model = SiteModel::new(&config, &stamp, &terms, &documents);
        let manifest = build_manifest(&model, &urls);
        assert_eq!(manifest.version, "2.1");
        assert_eq!(manifest.date_modified, "2026-02-27T00:00:00Z");
        let json = to_json(&manifest).expect("json");
        assert!(json.ends_with('\n'));
        assert!(json.contains(r#""@type": "Dataset""#));
        assert!(json.contains("doctrine:2.1"));
    }

    #[test]
    fn term_entries_carry_code_and_status_keywords() {
        let (config, stamp, terms, documents) = fixture();
        let urls = resolve_site(&config, &terms, &documents).expect("resolve");
        let model = SiteModel::new(&config, &stamp, &terms, &documents);
        let manifest = build_manifest(&model, &urls);
        let entry = manifest
            .distribution
            .iter()
            .find(|e| e.content_url.ends_with("/en/terms/scope"))
            .expect("term entry");
        assert!(entry.keywords.contains(&"SC".to_string()));
        assert!(entry.keywords.contains(&"canonical".to_string()));
        assert!(entry.keywords.contains(&"DefinedTerm".to_string()));
        assert_eq!(entry.identifier, "CAN-TERM-001");
    }
}
