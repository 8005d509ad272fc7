//! Tera rendering engine — embedded templates and the [`Renderer`].
//!
//! # Template mapping
//!
//! | Page           | Template        |
//! |----------------|-----------------|
//! | Term           | `term.html`     |
//! | Glossary index | `glossary.html` |
//! | Document       | `document.html` |
//!
//! Template names end in `.html` so Tera's autoescaping applies; generated
//! URLs and the pre-serialized JSON-LD graph are the only `| safe` values.

use tera::Tera;

use canon_core::types::{DocRole, Document, Term};

use crate::context::{self, SiteModel};
use crate::error::RenderError;

// ---------------------------------------------------------------------------
// Embedded templates — baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    ("shared/_head.html", include_str!("templates/_partials/head.tera")),
    ("shared/_topbar.html", include_str!("templates/_partials/topbar.tera")),
    ("shared/_footer.html", include_str!("templates/_partials/footer.tera")),
    ("term.html", include_str!("templates/term.html.tera")),
    ("glossary.html", include_str!("templates/glossary.html.tera")),
    ("document.html", include_str!("templates/document.html.tera")),
];

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Tera-based renderer over the embedded templates. Create once with
/// [`Renderer::new`] and reuse for every page of the run.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Construct a new [`Renderer`] with the embedded templates.
    pub fn new() -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TPLS.to_vec())?;
        Ok(Renderer { tera })
    }

    /// Render the page for `(term, tag)`.
    pub fn render_term_page(
        &self,
        model: &SiteModel<'_>,
        term: &Term,
        tag: &str,
    ) -> Result<String, RenderError> {
        let ctx = context::term_context(model, term, tag)?;
        Ok(self.tera.render("term.html", &ctx)?)
    }

    /// Render the glossary index for `tag`.
    pub fn render_glossary_page(
        &self,
        model: &SiteModel<'_>,
        doc: &Document,
        tag: &str,
    ) -> Result<String, RenderError> {
        let ctx = context::glossary_context(model, doc, tag)?;
        Ok(self.tera.render("glossary.html", &ctx)?)
    }

    /// Render a document page for `tag` (which may be `x-default`).
    pub fn render_document_page(
        &self,
        model: &SiteModel<'_>,
        doc: &Document,
        tag: &str,
    ) -> Result<String, RenderError> {
        let ctx = context::document_context(model, doc, tag)?;
        Ok(self.tera.render("document.html", &ctx)?)
    }

    /// Render the page for a document variant, dispatching the glossary role
    /// to the glossary template. The `x-default` selector variant always uses
    /// the document template.
    pub fn render_document_variant(
        &self,
        model: &SiteModel<'_>,
        doc: &Document,
        tag: &str,
    ) -> Result<String, RenderError> {
        if doc.role == DocRole::Glossary && model.config.locale(tag).is_some() {
            self.render_glossary_page(model, doc, tag)
        } else {
            self.render_document_page(model, doc, tag)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use canon_core::config::SiteConfig;
    use canon_core::types::{
        Classification, DocId, DocVariant, DocumentRegistry, Operability, RunStamp, Slug, TermId,
        TermRegistry, TermStatus, TermVariant,
    };

    use super::*;

    fn make_term(id: &str, slug: &str, related: &[&str]) -> Term {
        let mut variants = BTreeMap::new();
        variants.insert(
            "en".to_string(),
            TermVariant {
                label: format!("{slug} label"),
                definition: format!("The {slug} definition covers interpretation limits."),
            },
        );
        variants.insert(
            "fr-CA".to_string(),
            TermVariant {
                label: format!("{slug} étiquette"),
                definition: format!("La définition de {slug} couvre les limites."),
            },
        );
        Term {
            id: TermId::from(id),
            term_code: format!("TC-{slug}"),
            slug: Slug::from(slug),
            classification: Classification::Normative,
            status: TermStatus::Canonical,
            related: related.iter().map(|r| TermId::from(*r)).collect(),
            variants,
        }
    }

    fn make_doc(id: &str, role: DocRole, en: (&str, &str), fr: (&str, &str)) -> Document {
        let mut variants = BTreeMap::new();
        variants.insert(
            "en".to_string(),
            DocVariant {
                url: en.0.to_string(),
                title: en.1.to_string(),
                description: format!("{} description.", en.1),
            },
        );
        variants.insert(
            "fr-CA".to_string(),
            DocVariant {
                url: fr.0.to_string(),
                title: fr.1.to_string(),
                description: format!("{} description fr.", fr.1),
            },
        );
        Document {
            id: DocId::from(id),
            role,
            classification: Classification::Normative,
            operability: Operability::NonOperational,
            variants,
        }
    }

    fn fixture() -> (SiteConfig, RunStamp, TermRegistry, DocumentRegistry) {
        let config = SiteConfig::with_origin("https://canon.example.org").expect("config");
        let stamp = RunStamp {
            doctrine_version: "2.1".to_string(),
            generated_at: "2026-02-27T00:00:00Z".to_string(),
        };
        let terms = TermRegistry {
            schema_version: 1,
            doctrine_version: "2.1".to_string(),
            generated_at: "2026-02-27T00:00:00Z".to_string(),
            site_origin: config.origin.clone(),
            terms: vec![
                make_term("CAN-TERM-001", "scope", &["CAN-TERM-002", "CAN-TERM-NOPE"]),
                make_term("CAN-TERM-002", "drift", &[]),
            ],
        };
        let documents = DocumentRegistry {
            schema_version: 1,
            doctrine_version: "2.1".to_string(),
            generated_at: "2026-02-27T00:00:00Z".to_string(),
            site_origin: config.origin.clone(),
            documents: vec![
                make_doc("CAN-DOC-HOME", DocRole::Home, ("/en/", "Home"), ("/fr/", "Accueil")),
                make_doc(
                    "CAN-DOC-GLOSSARY",
                    DocRole::Glossary,
                    ("/en/glossary", "Glossary"),
                    ("/fr/glossaire", "Glossaire"),
                ),
            ],
        };
        (config, stamp, terms, documents)
    }

    #[test]
    fn term_page_renders_head_and_flags() {
        let (config, stamp, terms, documents) = fixture();
        let model = SiteModel::new(&config, &stamp, &terms, &documents);
        let renderer = Renderer::new().expect("renderer");
        let html = renderer
            .render_term_page(&model, &terms.terms[0], "en")
            .expect("render");

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<html lang="en">"#));
        assert!(html.contains("<title>scope label | Glossary | Canon Reference</title>"));
        assert!(html.contains(
            r#"<link rel="canonical" href="https://canon.example.org/en/terms/scope"/>"#
        ));
        assert!(html.contains(r#"<meta name="canon:status" content="doctrinal"/>"#));
        assert!(html.contains(r#"<meta name="canon:operability" content="non-operational"/>"#));
        assert!(html.contains(r#"<meta name="canon:doctrine-version" content="2.1"/>"#));
        assert!(html.contains(r#"<meta name="canon:entity-id" content="CAN-TERM-001"/>"#));
        assert!(html.contains(r#"<meta name="canon:term-code" content="TC-scope"/>"#));
        assert!(html.contains(r#"hreflang="x-default""#));
        assert!(html.contains(r#"hreflang="fr-CA" href="https://canon.example.org/fr/termes/scope""#));
    }

    #[test]
    fn term_page_embeds_parseable_jsonld() {
        let (config, stamp, terms, documents) = fixture();
        let model = SiteModel::new(&config, &stamp, &terms, &documents);
        let renderer = Renderer::new().expect("renderer");
        let html = renderer
            .render_term_page(&model, &terms.terms[0], "en")
            .expect("render");

        let start = html.find(r#"<script type="application/ld+json">"#).expect("script");
        let rest = &html[start + r#"<script type="application/ld+json">"#.len()..];
        let end = rest.find("</script>").expect("close");
        let graph: serde_json::Value = serde_json::from_str(&rest[..end]).expect("valid JSON");
        let nodes = graph["@graph"].as_array().expect("graph");
        let types: Vec<&str> = nodes.iter().map(|n| n["@type"].as_str().unwrap()).collect();
        assert_eq!(types, vec!["WebSite", "Person", "WebPage", "DefinedTerm"]);
        for node in nodes {
            assert!(node.get("keywords").is_none(), "governance must not leak into the graph");
        }
    }

    #[test]
    fn related_terms_render_with_resolvable_ids_only() {
        let (config, stamp, terms, documents) = fixture();
        let model = SiteModel::new(&config, &stamp, &terms, &documents);
        let renderer = Renderer::new().expect("renderer");
        let html = renderer
            .render_term_page(&model, &terms.terms[0], "en")
            .expect("render");
        assert!(html.contains(r#"<a href="/en/terms/drift">drift label</a>"#));
        assert!(!html.contains("CAN-TERM-NOPE"));
    }

    #[test]
    fn glossary_lists_every_term_and_term_set() {
        let (config, stamp, terms, documents) = fixture();
        let model = SiteModel::new(&config, &stamp, &terms, &documents);
        let renderer = Renderer::new().expect("renderer");
        let html = renderer
            .render_glossary_page(&model, &documents.documents[1], "fr-CA")
            .expect("render");
        assert!(html.contains(r#"<html lang="fr-CA">"#));
        assert!(html.contains("/fr/termes/scope"));
        assert!(html.contains("/fr/termes/drift"));
        assert!(html.contains("DefinedTermSet"));
        assert!(html.contains("glossaire#definedtermset"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let (config, stamp, terms, documents) = fixture();
        let model = SiteModel::new(&config, &stamp, &terms, &documents);
        let renderer = Renderer::new().expect("renderer");
        let first = renderer
            .render_glossary_page(&model, &documents.documents[1], "en")
            .expect("render");
        let second = renderer
            .render_glossary_page(&model, &documents.documents[1], "en")
            .expect("render");
        assert_eq!(first, second);
    }

    #[test]
    fn internal_links_never_carry_the_template_extension() {
        let (config, stamp, terms, documents) = fixture();
        let model = SiteModel::new(&config, &stamp, &terms, &documents);
        let renderer = Renderer::new().expect("renderer");
        for doc in &documents.documents {
            for tag in ["en", "fr-CA"] {
                let html = renderer.render_document_variant(&model, doc, tag).expect("render");
                for href in html.split("href=\"").skip(1) {
                    let target = href.split('"').next().unwrap_or_default();
                    assert!(
                        !target.ends_with(".html"),
                        "extension leaked into link: {target}"
                    );
                }
            }
        }
    }

    #[test]
    fn document_page_marks_active_nav_entry() {
        let (config, stamp, terms, documents) = fixture();
        let model = SiteModel::new(&config, &stamp, &terms, &documents);
        let renderer = Renderer::new().expect("renderer");
        let html = renderer
            .render_document_page(&model, &documents.documents[0], "en")
            .expect("render");
        assert!(html.contains(r#"<a class="active" href="/en/">Home</a>"#));
        assert!(html.contains(r#"<a class="" href="/en/glossary">Glossary</a>"#));
        assert!(html.contains(r#"<a href="/fr/">Français</a>"#));
    }
}
