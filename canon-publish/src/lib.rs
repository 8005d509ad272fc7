//! # canon-publish
//!
//! The build pipeline: renders every (entity, locale) page, derives the
//! manifest and sitemap, mirrors the registries, and writes the whole tree
//! through an atomic digest-tracked writer.
//!
//! [`build_site`] is the canonical entrypoint shared by the CLI and tests.

pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod sitemap;
pub mod writer;

pub use error::PublishError;
pub use pipeline::{build_site, Artifact, BuildReport};
pub use writer::WriteOutcome;
