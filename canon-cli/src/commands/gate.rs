//! `canon gate` — verify the generated tree.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use canon_gate::{run_gate, GateMode};

/// Arguments for `canon gate`.
#[derive(Args, Debug)]
pub struct GateArgs {
    /// Site root to verify.
    #[arg(long, default_value = ".")]
    pub site: PathBuf,

    /// Accumulate every violation instead of stopping at the first violated
    /// category.
    #[arg(long)]
    pub collect_all: bool,
}

impl GateArgs {
    pub fn run(self) -> Result<()> {
        let mode = if self.collect_all {
            GateMode::Collect
        } else {
            GateMode::FailFast
        };
        let report = run_gate(&self.site, mode)
            .with_context(|| format!("gate failed to read site at {}", self.site.display()))?;

        for warning in &report.warnings {
            println!("{} {warning}", "[WARN]".yellow().bold());
        }

        if report.passed() {
            println!(
                "{} all consistency checks passed ({} pages)",
                "[OK]".green().bold(),
                report.pages_checked,
            );
            return Ok(());
        }

        for violation in &report.violations {
            eprintln!("{} {violation}", "[FAIL]".red().bold());
        }
        bail!("consistency gate failed with {} violation(s)", report.violations.len());
    }
}
