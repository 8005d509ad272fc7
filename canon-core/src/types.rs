//! Domain types for the canon registries.
//!
//! Language-keyed maps are `BTreeMap` so that every iteration over variants
//! has a documented, stable order. All types are serializable via serde +
//! serde_json; registry structs use the camelCase wire names of the JSON
//! contract.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed stable identifier for a glossary term.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TermId(pub String);

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for TermId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TermId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed stable identifier for a document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocId(pub String);

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for DocId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DocId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A URL slug for a term page. Lowercase ASCII letters, digits, and hyphens.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slug(pub String);

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Slug {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Slug {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Normative weight of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Normative,
    Informative,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Normative => write!(f, "normative"),
            Classification::Informative => write!(f, "informative"),
        }
    }
}

/// Lifecycle status of a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TermStatus {
    #[default]
    Canonical,
    Draft,
    Deprecated,
}

impl fmt::Display for TermStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermStatus::Canonical => write!(f, "canonical"),
            TermStatus::Draft => write!(f, "draft"),
            TermStatus::Deprecated => write!(f, "deprecated"),
        }
    }
}

/// Role of a document within the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocRole {
    Home,
    Glossary,
    Reference,
}

impl fmt::Display for DocRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocRole::Home => write!(f, "home"),
            DocRole::Glossary => write!(f, "glossary"),
            DocRole::Reference => write!(f, "reference"),
        }
    }
}

/// Operability flag. This doctrine publishes reference material only, so the
/// set is closed to a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Operability {
    #[default]
    #[serde(rename = "non-operational")]
    NonOperational,
}

impl fmt::Display for Operability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "non-operational")
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// Language-scoped projection of a term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermVariant {
    pub label: String,
    pub definition: String,
}

/// A normative glossary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Term {
    pub id: TermId,
    pub term_code: String,
    pub slug: Slug,
    pub classification: Classification,
    pub status: TermStatus,
    #[serde(default)]
    pub related: Vec<TermId>,
    /// Keyed by language tag (e.g. `"en"`, `"fr-CA"`).
    pub variants: BTreeMap<String, TermVariant>,
}

/// Language-scoped projection of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocVariant {
    /// Site-relative path as authored (may carry a `.html` extension; the
    /// resolver strips it before the path becomes canonical).
    pub url: String,
    pub title: String,
    pub description: String,
}

/// A non-term page (home, glossary index, reference documents).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocId,
    pub role: DocRole,
    pub classification: Classification,
    #[serde(default)]
    pub operability: Operability,
    /// Keyed by language tag, plus an optional `x-default` selector variant.
    pub variants: BTreeMap<String, DocVariant>,
}

// ---------------------------------------------------------------------------
// Registries
// ---------------------------------------------------------------------------

/// Root of the terms registry (`data/terms.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermRegistry {
    pub schema_version: u32,
    pub doctrine_version: String,
    /// RFC 3339 timestamp, kept as the authored string so derived artifacts
    /// reproduce it byte-for-byte. Validated on load.
    pub generated_at: String,
    pub site_origin: String,
    pub terms: Vec<Term>,
}

/// Root of the documents registry (`data/documents.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRegistry {
    pub schema_version: u32,
    pub doctrine_version: String,
    pub generated_at: String,
    pub site_origin: String,
    pub documents: Vec<Document>,
}

/// Run-wide provenance values stamped on every derived artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStamp {
    pub doctrine_version: String,
    pub generated_at: String,
}

impl RunStamp {
    /// The terms registry is the authoritative source for both values once
    /// cross-registry agreement has been validated.
    pub fn from_registry(terms: &TermRegistry) -> Self {
        RunStamp {
            doctrine_version: terms.doctrine_version.clone(),
            generated_at: terms.generated_at.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newtype_display() {
        assert_eq!(TermId::from("CAN-TERM-001").to_string(), "CAN-TERM-001");
        assert_eq!(DocId::from("CAN-DOC-ROOT").to_string(), "CAN-DOC-ROOT");
        assert_eq!(Slug::from("bounded-interpretation").to_string(), "bounded-interpretation");
    }

    #[test]
    fn enum_wire_names() {
        assert_eq!(
            serde_json::to_string(&Classification::Normative).unwrap(),
            "\"normative\""
        );
        assert_eq!(serde_json::to_string(&TermStatus::Draft).unwrap(), "\"draft\"");
        assert_eq!(
            serde_json::to_string(&Operability::NonOperational).unwrap(),
            "\"non-operational\""
        );
        assert_eq!(serde_json::to_string(&DocRole::Glossary).unwrap(), "\"glossary\"");
    }

    #[test]
    fn term_deserializes_from_camel_case() {
        let json = r#"{
            "id": "CAN-TERM-001",
            "termCode": "BI",
            "slug": "bounded-interpretation",
            "classification": "normative",
            "status": "canonical",
            "related": ["CAN-TERM-002"],
            "variants": {
                "en": { "label": "Bounded interpretation", "definition": "A definition." },
                "fr-CA": { "label": "Interprétation bornée", "definition": "Une définition." }
            }
        }"#;
        let term: Term = serde_json::from_str(json).expect("deserialize");
        assert_eq!(term.term_code, "BI");
        assert_eq!(term.related.len(), 1);
        assert_eq!(term.variants.len(), 2);
        // BTreeMap: iteration order is the sorted tag order.
        let tags: Vec<&str> = term.variants.keys().map(String::as_str).collect();
        assert_eq!(tags, vec!["en", "fr-CA"]);
    }

    #[test]
    fn related_defaults_to_empty() {
        let json = r#"{
            "id": "CAN-TERM-003",
            "termCode": "XX",
            "slug": "plain",
            "classification": "informative",
            "status": "draft",
            "variants": { "en": { "label": "Plain", "definition": "d" } }
        }"#;
        let term: Term = serde_json::from_str(json).expect("deserialize");
        assert!(term.related.is_empty());
    }

    #[test]
    fn registry_serde_roundtrip() {
        let reg = TermRegistry {
            schema_version: 1,
            doctrine_version: "2.1".to_string(),
            generated_at: "2026-02-27T00:00:00Z".to_string(),
            site_origin: "https://canon.example.org".to_string(),
            terms: vec![],
        };
        let json = serde_json::to_string(&reg).expect("serialize");
        assert!(json.contains("\"doctrineVersion\":\"2.1\""));
        let back: TermRegistry = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, reg);
    }

    #[test]
    fn run_stamp_takes_terms_registry_values() {
        let reg = TermRegistry {
            schema_version: 1,
            doctrine_version: "3.0".to_string(),
            generated_at: "2026-03-01T12:00:00Z".to_string(),
            site_origin: "https://canon.example.org".to_string(),
            terms: vec![],
        };
        let stamp = RunStamp::from_registry(&reg);
        assert_eq!(stamp.doctrine_version, "3.0");
        assert_eq!(stamp.generated_at, "2026-03-01T12:00:00Z");
    }
}
