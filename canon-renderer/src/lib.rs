//! # canon-renderer
//!
//! Tera-based page renderer: one complete HTML document per (entity, locale)
//! pair, deterministic byte-for-byte for identical registry input.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use canon_renderer::{Renderer, SiteModel};
//!
//! fn render_all(model: &SiteModel<'_>) {
//!     if let Ok(renderer) = Renderer::new() {
//!         for term in &model.terms.terms {
//!             for locale in &model.config.locales {
//!                 if let Ok(html) = renderer.render_term_page(model, term, &locale.tag) {
//!                     println!("{} bytes", html.len());
//!                 }
//!             }
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod jsonld;
pub mod strings;
pub mod text;

pub use context::SiteModel;
pub use engine::Renderer;
pub use error::RenderError;
pub use text::truncate_description;
