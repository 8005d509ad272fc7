//! Structured-data graph — typed schema.org nodes embedded in every page.
//!
//! The graph is a closed set of node shapes: singleton `WebSite` and
//! publisher `Person`, one `WebPage` per rendered document, a `DefinedTerm`
//! on term pages and a `DefinedTermSet` on the glossary index. Doctrinal
//! pages are never typed as articles, and governance metadata is never
//! encoded here — the `canon:*` meta flags are its single representation.
//!
//! Struct field order is the serialization order, which makes graph output
//! deterministic.

use serde::Serialize;

use canon_core::config::SiteConfig;
use canon_core::types::{RunStamp, Term};

/// The JSON-LD context of every graph.
pub const SCHEMA_CONTEXT: &str = "https://schema.org";

/// A node reference (`{"@id": …}`).
#[derive(Debug, Clone, Serialize)]
pub struct NodeRef {
    #[serde(rename = "@id")]
    pub id: String,
}

impl NodeRef {
    pub fn new(id: impl Into<String>) -> Self {
        NodeRef { id: id.into() }
    }
}

/// Singleton site node.
#[derive(Debug, Clone, Serialize)]
pub struct WebSite {
    #[serde(rename = "@type")]
    pub node_type: &'static str,
    #[serde(rename = "@id")]
    pub id: String,
    pub url: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "inLanguage")]
    pub in_language: Vec<String>,
    pub publisher: NodeRef,
}

/// Singleton publisher node.
#[derive(Debug, Clone, Serialize)]
pub struct Person {
    #[serde(rename = "@type")]
    pub node_type: &'static str,
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
    pub url: String,
}

/// One page node per rendered document. Always `WebPage` — doctrinal pages
/// never declare article or generic creative-work types.
#[derive(Debug, Clone, Serialize)]
pub struct WebPage {
    #[serde(rename = "@type")]
    pub node_type: &'static str,
    #[serde(rename = "@id")]
    pub id: String,
    pub url: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "isPartOf")]
    pub is_part_of: NodeRef,
    #[serde(rename = "inLanguage")]
    pub in_language: String,
    #[serde(rename = "dateModified")]
    pub date_modified: String,
    pub author: NodeRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

/// Term node on term pages and inside the glossary term collection.
#[derive(Debug, Clone, Serialize)]
pub struct DefinedTerm {
    #[serde(rename = "@type")]
    pub node_type: &'static str,
    #[serde(rename = "@id")]
    pub id: String,
    pub url: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "inLanguage")]
    pub in_language: String,
    #[serde(rename = "termCode")]
    pub term_code: String,
    pub identifier: String,
    #[serde(rename = "inDefinedTermSet", skip_serializing_if = "Option::is_none")]
    pub in_defined_term_set: Option<NodeRef>,
}

/// Term collection node on the glossary index.
#[derive(Debug, Clone, Serialize)]
pub struct DefinedTermSet {
    #[serde(rename = "@type")]
    pub node_type: &'static str,
    #[serde(rename = "@id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "inLanguage")]
    pub in_language: String,
    #[serde(rename = "isPartOf")]
    pub is_part_of: NodeRef,
    #[serde(rename = "hasDefinedTerm")]
    pub has_defined_term: Vec<DefinedTerm>,
}

/// Any node the graph may carry.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Node {
    WebSite(WebSite),
    Person(Person),
    WebPage(WebPage),
    DefinedTerm(DefinedTerm),
    DefinedTermSet(DefinedTermSet),
}

/// A complete `@graph` document.
#[derive(Debug, Clone, Serialize)]
pub struct Graph {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@graph")]
    pub graph: Vec<Node>,
}

impl Graph {
    pub fn new(graph: Vec<Node>) -> Self {
        Graph { context: SCHEMA_CONTEXT, graph }
    }

    /// Compact JSON for embedding in a `<script>` block.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// `@id` of the singleton site node.
pub fn website_id(config: &SiteConfig) -> String {
    format!("{}/#website", config.origin)
}

/// `@id` of the singleton publisher node.
pub fn publisher_id(config: &SiteConfig) -> String {
    format!("{}/#publisher", config.origin)
}

/// The two singleton nodes every page graph starts with.
pub fn site_nodes(config: &SiteConfig) -> Vec<Node> {
    vec![
        Node::WebSite(WebSite {
            node_type: "WebSite",
            id: website_id(config),
            url: config.root_url(),
            name: config.site_name.clone(),
            description: config.site_description.clone(),
            in_language: config.locales.iter().map(|l| l.tag.clone()).collect(),
            publisher: NodeRef::new(publisher_id(config)),
        }),
        Node::Person(Person {
            node_type: "Person",
            id: publisher_id(config),
            name: config.publisher_name.clone(),
            url: config.publisher_url.clone(),
        }),
    ]
}

/// The page node for one rendered document.
pub fn web_page(
    config: &SiteConfig,
    stamp: &RunStamp,
    canonical: &str,
    name: &str,
    description: &str,
    lang: &str,
    identifier: Option<String>,
) -> WebPage {
    WebPage {
        node_type: "WebPage",
        id: format!("{canonical}#webpage"),
        url: canonical.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        is_part_of: NodeRef::new(website_id(config)),
        in_language: lang.to_string(),
        date_modified: stamp.generated_at.clone(),
        author: NodeRef::new(publisher_id(config)),
        identifier,
    }
}

/// The term node for a term page (or a collection entry when `term_set_id`
/// is `None`).
pub fn defined_term(
    term: &Term,
    lang: &str,
    canonical: &str,
    term_set_id: Option<String>,
) -> Option<DefinedTerm> {
    let variant = term.variants.get(lang)?;
    Some(DefinedTerm {
        node_type: "DefinedTerm",
        id: format!("{canonical}#term"),
        url: canonical.to_string(),
        name: variant.label.clone(),
        description: variant.definition.clone(),
        in_language: lang.to_string(),
        term_code: term.term_code.clone(),
        identifier: term.id.0.clone(),
        in_defined_term_set: term_set_id.map(NodeRef::new),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use canon_core::types::{Classification, Slug, TermId, TermStatus, TermVariant};

    use super::*;

    fn config() -> SiteConfig {
        SiteConfig::with_origin("https://canon.example.org").expect("config")
    }

    fn stamp() -> RunStamp {
        RunStamp {
            doctrine_version: "2.1".to_string(),
            generated_at: "2026-02-27T00:00:00Z".to_string(),
        }
    }

    fn term() -> Term {
        let mut variants = BTreeMap::new();
        variants.insert(
            "en".to_string(),
            TermVariant {
                label: "Scope".to_string(),
                definition: "What the doctrine covers.".to_string(),
            },
        );
        Term {
            id: TermId::from("CAN-TERM-001"),
            term_code: "SC".to_string(),
            slug: Slug::from("scope"),
            classification: Classification::Normative,
            status: TermStatus::Canonical,
            related: vec![],
            variants,
        }
    }

    #[test]
    fn graph_serializes_with_context_and_graph_keys() {
        let config = config();
        let graph = Graph::new(site_nodes(&config));
        let json = graph.to_json().expect("json");
        assert!(json.starts_with(r#"{"@context":"https://schema.org","@graph":["#));
        assert!(json.contains(r#""@type":"WebSite""#));
        assert!(json.contains(r#""@type":"Person""#));
    }

    #[test]
    fn web_page_is_never_an_article() {
        let config = config();
        let page = web_page(
            &config,
            &stamp(),
            "https://canon.example.org/en/scope",
            "Scope",
            "What the doctrine covers.",
            "en",
            Some("CAN-DOC-SCOPE".to_string()),
        );
        assert_eq!(page.node_type, "WebPage");
        let json = serde_json::to_string(&page).expect("json");
        assert!(!json.contains("Article"));
        assert!(!json.contains("keywords"));
        assert!(json.contains(r#""dateModified":"2026-02-27T00:00:00Z""#));
    }

    #[test]
    fn defined_term_uses_variant_and_fragment_id() {
        let node = defined_term(
            &term(),
            "en",
            "https://canon.example.org/en/terms/scope",
            Some("https://canon.example.org/en/glossary#definedtermset".to_string()),
        )
        .expect("node");
        assert_eq!(node.id, "https://canon.example.org/en/terms/scope#term");
        assert_eq!(node.name, "Scope");
        assert_eq!(node.term_code, "SC");
        assert!(node.in_defined_term_set.is_some());
    }

    #[test]
    fn defined_term_missing_variant_is_none() {
        assert!(defined_term(&term(), "fr-CA", "https://x/", None).is_none());
    }
}
