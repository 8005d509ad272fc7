//! Page context — the serializable payload handed to the template engine.
//!
//! One [`SiteModel`] is built per run from the loaded registries and passed
//! by reference to every render call; the per-page context structs here are
//! pure derivations of it.

use std::collections::BTreeMap;

use serde::Serialize;
use tera::Context;

use canon_core::config::{
    SiteConfig, DOCUMENTS_REGISTRY_PATH, MANIFEST_PATH, TERMS_REGISTRY_PATH,
};
use canon_core::locale::{self, X_DEFAULT};
use canon_core::types::{DocRole, Document, DocumentRegistry, RunStamp, Term, TermRegistry};

use crate::error::RenderError;
use crate::jsonld::{self, Graph, Node};
use crate::strings::{self, UiStrings};
use crate::text::truncate_description;

// ---------------------------------------------------------------------------
// Site model
// ---------------------------------------------------------------------------

/// Read-only view over everything a render call needs.
#[derive(Debug, Clone)]
pub struct SiteModel<'a> {
    pub config: &'a SiteConfig,
    pub stamp: &'a RunStamp,
    pub terms: &'a TermRegistry,
    pub documents: &'a DocumentRegistry,
    terms_by_id: BTreeMap<&'a str, &'a Term>,
}

impl<'a> SiteModel<'a> {
    pub fn new(
        config: &'a SiteConfig,
        stamp: &'a RunStamp,
        terms: &'a TermRegistry,
        documents: &'a DocumentRegistry,
    ) -> Self {
        let terms_by_id = terms.terms.iter().map(|t| (t.id.0.as_str(), t)).collect();
        SiteModel { config, stamp, terms, documents, terms_by_id }
    }

    pub fn term_by_id(&self, id: &str) -> Option<&'a Term> {
        self.terms_by_id.get(id).copied()
    }

    /// The glossary index document, if the registry declares one.
    pub fn glossary_doc(&self) -> Option<&'a Document> {
        self.documents
            .documents
            .iter()
            .find(|d| d.role == DocRole::Glossary)
    }
}

// ---------------------------------------------------------------------------
// Serializable context pieces
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct SiteCtx {
    pub name: String,
    pub origin: String,
    pub asset_version: String,
    pub doctrine_version: String,
    pub last_updated: String,
    pub og_image_url: String,
    pub manifest_url: String,
    pub terms_registry_url: String,
    pub manifest_path: &'static str,
    pub terms_registry_path: &'static str,
    pub documents_registry_path: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageCtx {
    pub lang: String,
    pub title: String,
    pub heading: String,
    pub description: String,
    pub canonical: String,
    pub og_locale: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlternateCtx {
    pub hreflang: String,
    pub href: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlagCtx {
    pub name: &'static str,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavCtx {
    pub label: String,
    pub href: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RelatedCtx {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TermCtx {
    pub id: String,
    pub code: String,
    pub status: String,
    pub classification: String,
    pub badge: &'static str,
    pub label: String,
    pub definition: String,
    pub related: Vec<RelatedCtx>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GlossaryItemCtx {
    pub label: String,
    pub href: String,
    pub definition: String,
    pub status: String,
    pub non_canonical: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GlossaryCtx {
    pub doc_id: String,
    pub badge: &'static str,
    pub classification: String,
    pub intro: String,
    pub items: Vec<GlossaryItemCtx>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocCtx {
    pub doc_id: String,
    pub badge: &'static str,
    pub classification: String,
    pub intro: String,
}

// ---------------------------------------------------------------------------
// Shared builders
// ---------------------------------------------------------------------------

fn site_ctx(model: &SiteModel<'_>) -> SiteCtx {
    let config = model.config;
    SiteCtx {
        name: config.site_name.clone(),
        origin: config.origin.clone(),
        asset_version: config.asset_version.clone(),
        doctrine_version: model.stamp.doctrine_version.clone(),
        last_updated: model.stamp.generated_at.clone(),
        og_image_url: config.absolute(&config.og_image_path),
        manifest_url: config.absolute(MANIFEST_PATH),
        terms_registry_url: config.absolute(TERMS_REGISTRY_PATH),
        manifest_path: MANIFEST_PATH,
        terms_registry_path: TERMS_REGISTRY_PATH,
        documents_registry_path: DOCUMENTS_REGISTRY_PATH,
    }
}

/// Language tag used for chrome (strings, nav labels) on a page. The
/// `x-default` selector page borrows the default locale's chrome.
fn display_tag<'s>(model: &'s SiteModel<'_>, tag: &'s str) -> &'s str {
    if tag == X_DEFAULT {
        &model.config.default_locale().tag
    } else {
        tag
    }
}

fn og_locale(model: &SiteModel<'_>, tag: &str) -> String {
    model
        .config
        .locale(tag)
        .map(|l| l.og_locale.clone())
        .unwrap_or_else(|| model.config.default_locale().og_locale.clone())
}

fn badge_for(classification: canon_core::types::Classification, s: &UiStrings) -> &'static str {
    match classification {
        canon_core::types::Classification::Normative => s.badge_normative,
        canon_core::types::Classification::Informative => s.badge_informative,
    }
}

/// Topbar nav: one entry per registry document, in registry order.
fn nav_for(model: &SiteModel<'_>, chrome_tag: &str, active: Option<&str>) -> Vec<NavCtx> {
    model
        .documents
        .documents
        .iter()
        .filter_map(|doc| {
            let variant = doc.variants.get(chrome_tag)?;
            Some(NavCtx {
                label: variant.title.clone(),
                href: locale::document_path(model.config, &variant.url),
                active: active == Some(doc.id.0.as_str()),
            })
        })
        .collect()
}

/// Language switch links: every locale other than the current one, pointing
/// at this entity's page in that locale.
fn switches(
    model: &SiteModel<'_>,
    current_tag: &str,
    mut href_for: impl FnMut(&str) -> Option<String>,
) -> Vec<NavCtx> {
    model
        .config
        .locales
        .iter()
        .filter(|l| l.tag != current_tag)
        .filter_map(|l| {
            Some(NavCtx {
                label: l.display_name.clone(),
                href: href_for(&l.tag)?,
                active: false,
            })
        })
        .collect()
}

fn insert_common(
    ctx: &mut Context,
    model: &SiteModel<'_>,
    page: PageCtx,
    alternates: Vec<AlternateCtx>,
    flags: Vec<FlagCtx>,
    graph: Graph,
    nav: Vec<NavCtx>,
    switch_links: Vec<NavCtx>,
    s: &UiStrings,
) -> Result<(), RenderError> {
    ctx.insert("site", &site_ctx(model));
    ctx.insert("page", &page);
    ctx.insert("alternates", &alternates);
    ctx.insert("flags", &flags);
    ctx.insert("jsonld", &graph.to_json()?);
    ctx.insert("nav", &nav);
    ctx.insert("switches", &switch_links);
    ctx.insert("s", s);
    Ok(())
}

fn alternates_from(
    cluster: &canon_core::locale::LocaleCluster,
    config: &SiteConfig,
) -> Vec<AlternateCtx> {
    cluster
        .alternates(config)
        .into_iter()
        .map(|(hreflang, href)| AlternateCtx { hreflang, href })
        .collect()
}

// ---------------------------------------------------------------------------
// Per-page contexts
// ---------------------------------------------------------------------------

/// Context for a term page in `tag`.
pub fn term_context(
    model: &SiteModel<'_>,
    term: &Term,
    tag: &str,
) -> Result<Context, RenderError> {
    let config = model.config;
    let variant = term.variants.get(tag).ok_or_else(|| RenderError::MissingVariant {
        id: term.id.0.clone(),
        lang: tag.to_string(),
    })?;
    let s = strings::for_tag(tag);
    let cluster = locale::resolve_term(config, term);
    let canonical = cluster
        .url_for(tag)
        .unwrap_or_else(|| cluster.fallback())
        .to_string();

    let description = truncate_description(&variant.definition, config.description_cap);
    let page = PageCtx {
        lang: tag.to_string(),
        title: format!("{} | {} | {}", variant.label, s.glossary, config.site_name),
        heading: variant.label.clone(),
        description: description.clone(),
        canonical: canonical.clone(),
        og_locale: og_locale(model, tag),
    };

    let flags = vec![
        FlagCtx { name: "canon:classification", content: term.classification.to_string() },
        FlagCtx { name: "canon:entity-type", content: "DefinedTerm".to_string() },
        FlagCtx { name: "canon:entity-id", content: term.id.0.clone() },
        FlagCtx { name: "canon:term-code", content: term.term_code.clone() },
        FlagCtx { name: "canon:entity-status", content: term.status.to_string() },
    ];

    // Related links: ids that don't resolve are dropped, never an error.
    let related: Vec<RelatedCtx> = term
        .related
        .iter()
        .filter_map(|rid| model.term_by_id(&rid.0))
        .filter_map(|rt| {
            let label = rt.variants.get(tag)?.label.clone();
            Some(RelatedCtx {
                label,
                href: locale::term_path(config, tag, &rt.slug),
            })
        })
        .collect();

    let term_set_id = model.glossary_doc().and_then(|doc| {
        let cluster = locale::resolve_document(config, doc);
        Some(format!("{}#definedtermset", cluster.url_for(tag)?))
    });
    let mut nodes = jsonld::site_nodes(config);
    nodes.push(Node::WebPage(jsonld::web_page(
        config,
        model.stamp,
        &canonical,
        &variant.label,
        &description,
        tag,
        Some(term.id.0.clone()),
    )));
    if let Some(node) = jsonld::defined_term(term, tag, &canonical, term_set_id) {
        nodes.push(Node::DefinedTerm(node));
    }

    let glossary_id = model.glossary_doc().map(|d| d.id.0.clone());
    let nav = nav_for(model, tag, glossary_id.as_deref());
    let switch_links = switches(model, tag, |other| {
        Some(locale::term_path(config, other, &term.slug))
    });

    let term_ctx = TermCtx {
        id: term.id.0.clone(),
        code: term.term_code.clone(),
        status: term.status.to_string(),
        classification: term.classification.to_string(),
        badge: badge_for(term.classification, s),
        label: variant.label.clone(),
        definition: variant.definition.clone(),
        related,
    };

    let mut ctx = Context::new();
    insert_common(
        &mut ctx,
        model,
        page,
        alternates_from(&cluster, config),
        flags,
        Graph::new(nodes),
        nav,
        switch_links,
        s,
    )?;
    ctx.insert("term", &term_ctx);
    Ok(ctx)
}

/// Context for the glossary index page in `tag`.
pub fn glossary_context(
    model: &SiteModel<'_>,
    doc: &Document,
    tag: &str,
) -> Result<Context, RenderError> {
    let config = model.config;
    let variant = doc.variants.get(tag).ok_or_else(|| RenderError::MissingVariant {
        id: doc.id.0.clone(),
        lang: tag.to_string(),
    })?;
    let s = strings::for_tag(tag);
    let cluster = locale::resolve_document(config, doc);
    let canonical = cluster
        .url_for(tag)
        .unwrap_or_else(|| cluster.fallback())
        .to_string();

    let description = truncate_description(&variant.description, config.description_cap);
    let page = PageCtx {
        lang: tag.to_string(),
        title: format!("{} | {}", variant.title, config.site_name),
        heading: variant.title.clone(),
        description: description.clone(),
        canonical: canonical.clone(),
        og_locale: og_locale(model, tag),
    };

    let flags = vec![
        FlagCtx { name: "canon:doc-id", content: doc.id.0.clone() },
        FlagCtx { name: "canon:classification", content: doc.classification.to_string() },
    ];

    // Glossary listing: sorted by the locale's lowercased label.
    let mut listed: Vec<&Term> = model
        .terms
        .terms
        .iter()
        .filter(|t| t.variants.contains_key(tag))
        .collect();
    listed.sort_by_key(|t| t.variants[tag].label.to_lowercase());

    let items: Vec<GlossaryItemCtx> = listed
        .iter()
        .map(|t| {
            let v = &t.variants[tag];
            GlossaryItemCtx {
                label: v.label.clone(),
                href: locale::term_path(config, tag, &t.slug),
                definition: v.definition.clone(),
                status: t.status.to_string(),
                non_canonical: t.status != canon_core::types::TermStatus::Canonical,
            }
        })
        .collect();

    let term_set_id = format!("{canonical}#definedtermset");
    let entries: Vec<jsonld::DefinedTerm> = listed
        .iter()
        .filter_map(|t| {
            let url = locale::resolve_term(config, t).url_for(tag)?.to_string();
            jsonld::defined_term(t, tag, &url, None)
        })
        .collect();

    let mut nodes = jsonld::site_nodes(config);
    nodes.push(Node::WebPage(jsonld::web_page(
        config,
        model.stamp,
        &canonical,
        &variant.title,
        &description,
        tag,
        Some(doc.id.0.clone()),
    )));
    nodes.push(Node::DefinedTermSet(jsonld::DefinedTermSet {
        node_type: "DefinedTermSet",
        id: term_set_id,
        name: variant.title.clone(),
        in_language: tag.to_string(),
        is_part_of: jsonld::NodeRef::new(jsonld::website_id(config)),
        has_defined_term: entries,
    }));

    let nav = nav_for(model, tag, Some(doc.id.0.as_str()));
    let switch_links = switches(model, tag, |other| {
        doc.variants
            .get(other)
            .map(|v| locale::document_path(config, &v.url))
    });

    let glossary_ctx = GlossaryCtx {
        doc_id: doc.id.0.clone(),
        badge: badge_for(doc.classification, s),
        classification: doc.classification.to_string(),
        intro: variant.description.clone(),
        items,
    };

    let mut ctx = Context::new();
    insert_common(
        &mut ctx,
        model,
        page,
        alternates_from(&cluster, config),
        flags,
        Graph::new(nodes),
        nav,
        switch_links,
        s,
    )?;
    ctx.insert("glossary", &glossary_ctx);
    Ok(ctx)
}

/// Context for a document page in `tag` (which may be `x-default`).
pub fn document_context(
    model: &SiteModel<'_>,
    doc: &Document,
    tag: &str,
) -> Result<Context, RenderError> {
    let config = model.config;
    let variant = doc.variants.get(tag).ok_or_else(|| RenderError::MissingVariant {
        id: doc.id.0.clone(),
        lang: tag.to_string(),
    })?;
    let chrome_tag = display_tag(model, tag);
    let s = strings::for_tag(chrome_tag);
    let cluster = locale::resolve_document(config, doc);
    let canonical = if tag == X_DEFAULT {
        cluster.fallback().to_string()
    } else {
        cluster
            .url_for(tag)
            .unwrap_or_else(|| cluster.fallback())
            .to_string()
    };

    let description = truncate_description(&variant.description, config.description_cap);
    let page = PageCtx {
        lang: chrome_tag.to_string(),
        title: format!("{} | {}", variant.title, config.site_name),
        heading: variant.title.clone(),
        description: description.clone(),
        canonical: canonical.clone(),
        og_locale: og_locale(model, chrome_tag),
    };

    let flags = vec![
        FlagCtx { name: "canon:doc-id", content: doc.id.0.clone() },
        FlagCtx { name: "canon:classification", content: doc.classification.to_string() },
    ];

    let mut nodes = jsonld::site_nodes(config);
    nodes.push(Node::WebPage(jsonld::web_page(
        config,
        model.stamp,
        &canonical,
        &variant.title,
        &description,
        chrome_tag,
        Some(doc.id.0.clone()),
    )));

    let nav = nav_for(model, chrome_tag, Some(doc.id.0.as_str()));
    // The selector page links to every locale; regular pages to the others.
    let switch_current = if tag == X_DEFAULT { X_DEFAULT } else { tag };
    let switch_links = switches(model, switch_current, |other| {
        doc.variants
            .get(other)
            .map(|v| locale::document_path(config, &v.url))
    });

    let doc_ctx = DocCtx {
        doc_id: doc.id.0.clone(),
        badge: badge_for(doc.classification, s),
        classification: doc.classification.to_string(),
        intro: variant.description.clone(),
    };

    let mut ctx = Context::new();
    insert_common(
        &mut ctx,
        model,
        page,
        alternates_from(&cluster, config),
        flags,
        Graph::new(nodes),
        nav,
        switch_links,
        s,
    )?;
    ctx.insert("doc", &doc_ctx);
    Ok(ctx)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use canon_core::types::{
        Classification, DocId, DocVariant, Operability, Slug, TermId, TermStatus, TermVariant,
    };

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

    fn term(id: &str, slug: &str, related: &[&str]) -> Term {
        let mut variants = BTreeMap::new();
        for tag in ["en", "fr-CA"] {
            variants.insert(
                tag.to_string(),
                TermVariant {
                    label: format!("{slug} {tag}"),
                    definition: format!("Definition of {slug} in {tag}."),
                },
            );
        }
        Term {
            id: TermId::from(id),
            term_code: format!("TC-{id}"),
            slug: Slug::from(slug),
            classification: Classification::Normative,
            status: TermStatus::Canonical,
            related: related.iter().map(|r| TermId::from(*r)).collect(),
            variants,
        }
    }

    fn glossary_doc() -> Document {
        let mut variants = BTreeMap::new();
        variants.insert(
            "en".to_string(),
            DocVariant {
                url: "/en/glossary".to_string(),
                title: "Glossary".to_string(),
                description: "Canonical definitions.".to_string(),
            },
        );
        variants.insert(
            "fr-CA".to_string(),
            DocVariant {
                url: "/fr/glossaire".to_string(),
                title: "Glossaire".to_string(),
                description: "Définitions canoniques.".to_string(),
            },
        );
        Document {
            id: DocId::from("CAN-DOC-GLOSSARY"),
            role: DocRole::Glossary,
            classification: Classification::Normative,
            operability: Operability::NonOperational,
            variants,
        }
    }

    fn registries() -> (TermRegistry, DocumentRegistry) {
        let terms = TermRegistry {
            schema_version: 1,
            doctrine_version: "2.1".to_string(),
            generated_at: "2026-02-27T00:00:00Z".to_string(),
            site_origin: "https://canon.example.org".to_string(),
            terms: vec![
                term("CAN-TERM-001", "scope", &["CAN-TERM-002", "CAN-TERM-MISSING"]),
                term("CAN-TERM-002", "drift", &[]),
            ],
        };
        let documents = DocumentRegistry {
            schema_version: 1,
            doctrine_version: "2.1".to_string(),
            generated_at: "2026-02-27T00:00:00Z".to_string(),
            site_origin: "https://canon.example.org".to_string(),
            documents: vec![glossary_doc()],
        };
        (terms, documents)
    }

    #[test]
    fn unresolvable_related_ids_are_dropped() {
        let config = config();
        let stamp = stamp();
        let (terms, documents) = registries();
        let model = SiteModel::new(&config, &stamp, &terms, &documents);
        let ctx = term_context(&model, &terms.terms[0], "en").expect("context");
        let json = ctx.into_json();
        let related = json["term"]["related"].as_array().expect("related");
        assert_eq!(related.len(), 1);
        assert_eq!(related[0]["href"], "/en/terms/drift");
    }

    #[test]
    fn term_context_has_canonical_and_flags() {
        let config = config();
        let stamp = stamp();
        let (terms, documents) = registries();
        let model = SiteModel::new(&config, &stamp, &terms, &documents);
        let ctx = term_context(&model, &terms.terms[0], "fr-CA").expect("context");
        let json = ctx.into_json();
        assert_eq!(
            json["page"]["canonical"],
            "https://canon.example.org/fr/termes/scope"
        );
        assert_eq!(json["page"]["og_locale"], "fr_CA");
        let flags = json["flags"].as_array().expect("flags");
        assert!(flags
            .iter()
            .any(|f| f["name"] == "canon:entity-id" && f["content"] == "CAN-TERM-001"));
    }

    #[test]
    fn glossary_items_sorted_by_label() {
        let config = config();
        let stamp = stamp();
        let (terms, documents) = registries();
        let model = SiteModel::new(&config, &stamp, &terms, &documents);
        let ctx = glossary_context(&model, &documents.documents[0], "en").expect("context");
        let json = ctx.into_json();
        let items = json["glossary"]["items"].as_array().expect("items");
        let labels: Vec<&str> = items.iter().map(|i| i["label"].as_str().unwrap()).collect();
        assert_eq!(labels, vec!["drift en", "scope en"]);
    }

    #[test]
    fn missing_variant_is_an_error() {
        let config = config();
        let stamp = stamp();
        let (mut terms, documents) = registries();
        terms.terms[0].variants.remove("fr-CA");
        let model = SiteModel::new(&config, &stamp, &terms, &documents);
        let err = term_context(&model, &terms.terms[0], "fr-CA").unwrap_err();
        assert!(matches!(err, RenderError::MissingVariant { .. }));
    }
}
