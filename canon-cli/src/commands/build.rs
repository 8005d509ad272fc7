//! `canon build` — generate the full output tree.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use canon_publish::build_site;

/// Arguments for `canon build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Site root containing `data/terms.json` and `data/documents.json`.
    #[arg(long, default_value = ".")]
    pub site: PathBuf,

    /// List every written artifact with its content digest.
    #[arg(long)]
    pub verbose: bool,
}

impl BuildArgs {
    pub fn run(self) -> Result<()> {
        let report = build_site(&self.site)
            .with_context(|| format!("build failed for site at {}", self.site.display()))?;

        println!(
            "{} built {} artifacts (doctrine {}, generated {})",
            "✓".green().bold(),
            report.artifacts.len(),
            report.doctrine_version,
            report.generated_at,
        );
        if self.verbose {
            for artifact in &report.artifacts {
                println!(
                    "  {}  {}",
                    &artifact.digest[..12],
                    artifact.rel_path.display()
                );
            }
        }
        Ok(())
    }
}
