//! Shared build pipeline entrypoint used by the CLI and by tests.
//!
//! Load → configure → validate → resolve → render → aggregate → write.
//! Every aggregation point sorts by a stated key; every file is written
//! exactly once per run. Any failure aborts the run with no partial output
//! considered valid.

use std::path::{Path, PathBuf};

use canon_core::config::{
    SiteConfig, DOCUMENTS_REGISTRY_PATH, MANIFEST_PATH, TERMS_REGISTRY_PATH,
    WELL_KNOWN_DOCUMENTS_PATH, WELL_KNOWN_MANIFEST_PATH, WELL_KNOWN_TERMS_PATH,
};
use canon_core::locale;
use canon_core::registry;
use canon_core::types::RunStamp;
use canon_renderer::{Renderer, SiteModel};

use crate::error::{io_err, PublishError};
use crate::manifest;
use crate::sitemap;
use crate::writer::{self, WriteOutcome};

/// Site-relative path of the sitemap artifact.
pub const SITEMAP_PATH: &str = "/sitemap.xml";

/// One written artifact of a build run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Path relative to the site root.
    pub rel_path: PathBuf,
    pub bytes: usize,
    /// SHA-256 hex digest of the written content.
    pub digest: String,
}

/// Summary of a completed build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub doctrine_version: String,
    pub generated_at: String,
    /// Every written artifact, sorted by relative path.
    pub artifacts: Vec<Artifact>,
}

enum Output {
    Text(String),
    Bytes(Vec<u8>),
}

fn rel(path: &str) -> PathBuf {
    PathBuf::from(path.trim_start_matches('/'))
}

/// Generate the full output tree for the site rooted at `site_root`.
pub fn build_site(site_root: &Path) -> Result<BuildReport, PublishError> {
    let (terms_reg, docs_reg) = registry::load_registries_at(site_root)?;
    let config = SiteConfig::from_registries(&terms_reg, &docs_reg)?;
    registry::validate(&terms_reg, &docs_reg, &config)?;
    let urls = locale::resolve_site(&config, &terms_reg, &docs_reg)?;
    let stamp = RunStamp::from_registry(&terms_reg);
    let model = SiteModel::new(&config, &stamp, &terms_reg, &docs_reg);
    let renderer = Renderer::new()?;

    let mut outputs: Vec<(PathBuf, Output)> = Vec::new();

    // Document pages: registry order, variant tags in sorted order.
    for doc in &docs_reg.documents {
        for (tag, variant) in &doc.variants {
            let html = renderer.render_document_variant(&model, doc, tag)?;
            outputs.push((locale::file_path_for(&variant.url), Output::Text(html)));
        }
    }

    // Term pages: registry order, configured locale order.
    for term in &terms_reg.terms {
        for loc in &config.locales {
            let html = renderer.render_term_page(&model, term, &loc.tag)?;
            outputs.push((
                locale::term_file_path(&config, &loc.tag, &term.slug),
                Output::Text(html),
            ));
        }
    }

    // Manifest plus its .well-known mirror.
    let manifest_json = manifest::to_json(&manifest::build_manifest(&model, &urls))?;
    outputs.push((rel(MANIFEST_PATH), Output::Text(manifest_json.clone())));
    outputs.push((rel(WELL_KNOWN_MANIFEST_PATH), Output::Text(manifest_json)));

    // Sitemap.
    outputs.push((
        rel(SITEMAP_PATH),
        Output::Text(sitemap::build_sitemap(&config, &docs_reg, &urls, &stamp)),
    ));

    // Registry mirrors: raw bytes, copied verbatim.
    for (source, mirror) in [
        (TERMS_REGISTRY_PATH, WELL_KNOWN_TERMS_PATH),
        (DOCUMENTS_REGISTRY_PATH, WELL_KNOWN_DOCUMENTS_PATH),
    ] {
        let source_path = site_root.join(rel(source));
        let raw = std::fs::read(&source_path).map_err(|e| io_err(&source_path, e))?;
        outputs.push((rel(mirror), Output::Bytes(raw)));
    }

    // Write everything, sorted by relative path.
    outputs.sort_by(|a, b| a.0.cmp(&b.0));
    let mut artifacts = Vec::with_capacity(outputs.len());
    for (rel_path, output) in outputs {
        let target = site_root.join(&rel_path);
        let outcome: WriteOutcome = match output {
            Output::Text(content) => writer::write_text_atomic(&target, &content)?,
            Output::Bytes(bytes) => writer::write_bytes_atomic(&target, &bytes)?,
        };
        artifacts.push(Artifact {
            rel_path,
            bytes: outcome.bytes,
            digest: outcome.digest,
        });
    }

    tracing::debug!("build complete: {} artifacts", artifacts.len());
    Ok(BuildReport {
        doctrine_version: stamp.doctrine_version,
        generated_at: stamp.generated_at,
        artifacts,
    })
}
