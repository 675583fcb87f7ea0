//! # stanza-renderer
//!
//! Tera-based renderer that writes one template, bound to a resolved context,
//! to an output file.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use stanza_core::{resolve_context, TextEncoding};
//! use stanza_renderer::TemplateRenderer;
//!
//! fn render_readme() -> Result<(), Box<dyn std::error::Error>> {
//!     let props = std::collections::HashMap::new();
//!     let ctx = resolve_context(Some("---\ntext: Hello\n"), &props, TextEncoding::utf8())?
//!         .expect("inline context");
//!     let renderer = TemplateRenderer::new(TextEncoding::utf8());
//!     renderer.render(Path::new("templates/README.md"), &ctx, Path::new("out/README.md"))?;
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::{tera_context, ROOT_BINDING};
pub use engine::{render, RenderOutcome, TemplateRenderer};
pub use error::RenderError;
