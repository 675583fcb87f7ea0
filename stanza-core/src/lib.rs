//! # stanza-core
//!
//! Context resolution for stanza: turns a context specification (inline YAML
//! document, `file:` reference, or nothing) into a structured value after
//! `${name}` property substitution.
//!
//! - [`spec`] — [`ContextSpec`] parsing and raw source loading
//! - [`properties`] — [`PropertySource`] and [`substitute`]
//! - [`resolver`] — [`ContextResolver`] and [`ResolvedContext`]
//! - [`encoding`] — [`TextEncoding`]
//! - [`error`] — [`ContextError`]
//!
//! ## Usage
//!
//! ```rust
//! use std::collections::HashMap;
//! use stanza_core::{resolve_context, TextEncoding};
//!
//! let mut props = HashMap::new();
//! props.insert("greeting".to_string(), "Hello".to_string());
//!
//! let ctx = resolve_context(Some("---\ntext: ${greeting} test\n"), &props, TextEncoding::utf8())
//!     .unwrap()
//!     .expect("inline context");
//! assert_eq!(ctx.value()["text"].as_str(), Some("Hello test"));
//! ```

pub mod encoding;
pub mod error;
pub mod properties;
pub mod resolver;
pub mod spec;

pub use encoding::TextEncoding;
pub use error::ContextError;
pub use properties::{substitute, PropertySource, Substitution};
pub use resolver::{resolve_context, ContextResolver, ResolvedContext};
pub use spec::{load_context_source, ContextSpec, DOCUMENT_MARKER, FILE_PREFIX};
