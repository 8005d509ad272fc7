//! Canon — deterministic multilingual doctrine-site publisher.
//!
//! # Usage
//!
//! ```text
//! canon build [--site <dir>] [--verbose]
//! canon gate  [--site <dir>] [--collect-all]
//! ```
//!
//! `build` derives the full output tree (pages, manifest, sitemap, registry
//! mirrors) from `data/terms.json` and `data/documents.json`. `gate`
//! re-reads the tree and fails with a non-zero exit on the first violated
//! consistency rule.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{build::BuildArgs, gate::GateArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "canon",
    version,
    about = "Publish and verify a doctrinal reference site from canonical registries",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate every derived artifact from the registries.
    Build(BuildArgs),

    /// Verify the generated tree against the registries.
    Gate(GateArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Build(args) => args.run(),
        Commands::Gate(args) => args.run(),
    }
}
