//! Per-locale UI string catalog.
//!
//! All user-facing chrome strings are routed through this catalog so page
//! texture is localized in one place. Lookup is by language prefix; English
//! is the fallback for unknown tags.

use serde::Serialize;

/// UI chrome strings for one language.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UiStrings {
    pub tagline: &'static str,
    pub glossary: &'static str,
    pub definition: &'static str,
    pub related_terms: &'static str,
    pub terms: &'static str,
    pub entity: &'static str,
    pub doc_id: &'static str,
    pub term_code: &'static str,
    pub entity_status: &'static str,
    pub machine_registry: &'static str,
    pub canonical_manifest: &'static str,
    pub doctrine: &'static str,
    pub non_operational: &'static str,
    pub last_updated: &'static str,
    pub footer_note: &'static str,
    pub glossary_tip: &'static str,
    pub badge_normative: &'static str,
    pub badge_informative: &'static str,
}

const EN: UiStrings = UiStrings {
    tagline: "Personal conceptual reference. Not an implementation.",
    glossary: "Glossary",
    definition: "Definition",
    related_terms: "Related terms",
    terms: "Terms",
    entity: "Entity",
    doc_id: "Doc ID",
    term_code: "Term code",
    entity_status: "Entity status",
    machine_registry: "Machine registry",
    canonical_manifest: "Canonical manifest",
    doctrine: "Doctrine",
    non_operational: "Non-operational",
    last_updated: "Last updated",
    footer_note: "This site is intentionally non-operational: it contains no scoring weights, thresholds, calibrated protocols, datasets, or execution tooling.",
    glossary_tip: "Use the term pages for stable links and structured data.",
    badge_normative: "normative",
    badge_informative: "informative",
};

const FR: UiStrings = UiStrings {
    tagline: "Référence conceptuelle personnelle. Non opérable.",
    glossary: "Glossaire",
    definition: "Définition",
    related_terms: "Termes liés",
    terms: "Termes",
    entity: "Entité",
    doc_id: "ID doc",
    term_code: "Code terme",
    entity_status: "Statut entité",
    machine_registry: "Registre machine",
    canonical_manifest: "Manifest canonique",
    doctrine: "Doctrine",
    non_operational: "Non opérable",
    last_updated: "Dernière mise à jour",
    footer_note: "Ce site est volontairement non opérable : il ne contient ni pondérations, ni seuils, ni protocoles calibrés, ni jeux de données, ni outillage d'exécution.",
    glossary_tip: "Utilise les pages de termes pour des liens stables et des données structurées.",
    badge_normative: "normatif",
    badge_informative: "informatif",
};

/// Catalog lookup by language tag. `fr*` maps to French; everything else
/// falls back to English.
pub fn for_tag(tag: &str) -> &'static UiStrings {
    let lang = tag.split(['-', '_']).next().unwrap_or("");
    match lang.to_ascii_lowercase().as_str() {
        "fr" => &FR,
        _ => &EN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn french_region_tags_resolve_to_french() {
        assert_eq!(for_tag("fr-CA").glossary, "Glossaire");
        assert_eq!(for_tag("fr").definition, "Définition");
    }

    #[test]
    fn unknown_tags_fall_back_to_english() {
        assert_eq!(for_tag("de").glossary, "Glossary");
        assert_eq!(for_tag("x-default").definition, "Definition");
        assert_eq!(for_tag("").terms, "Terms");
    }
}
