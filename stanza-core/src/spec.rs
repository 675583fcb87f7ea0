//! Context specifications and raw source discovery.
//!
//! A context spec takes one of three shapes:
//!
//! | Shape              | Example                    | Source                 |
//! |--------------------|----------------------------|------------------------|
//! | inline document    | `"---\ntext: hi\n"`        | the spec itself        |
//! | file reference     | `"file:ctx/context.yaml"`  | file contents          |
//! | absent             | `""`                       | inherited from scope   |

use std::path::{Path, PathBuf};

use crate::encoding::TextEncoding;
use crate::error::{read_err, ContextError};

/// YAML document-start marker that identifies an inline context.
pub const DOCUMENT_MARKER: &str = "---\n";

/// Prefix that identifies a context file reference.
pub const FILE_PREFIX: &str = "file:";

/// A parsed, non-empty context specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextSpec {
    /// Raw YAML text, marker included.
    Inline(String),
    /// Path to a YAML file, as written after `file:`.
    File(PathBuf),
}

impl ContextSpec {
    /// Classify a spec string. Empty input means "no context at this level";
    /// whitespace-only input is not a valid spec.
    pub fn parse(spec: &str) -> Result<Option<Self>, ContextError> {
        if spec.is_empty() {
            return Ok(None);
        }
        if spec.starts_with(DOCUMENT_MARKER) {
            return Ok(Some(ContextSpec::Inline(spec.to_string())));
        }
        match spec.trim().strip_prefix(FILE_PREFIX) {
            Some(path) => Ok(Some(ContextSpec::File(PathBuf::from(path.trim())))),
            None => Err(ContextError::InvalidSpec {
                spec: spec.to_string(),
            }),
        }
    }

    /// Return the raw YAML text this spec points at.
    ///
    /// Relative file references are joined onto `base_dir` when one is given.
    pub fn load(
        &self,
        encoding: TextEncoding,
        base_dir: Option<&Path>,
    ) -> Result<String, ContextError> {
        match self {
            ContextSpec::Inline(text) => Ok(text.clone()),
            ContextSpec::File(path) => {
                let path = match base_dir {
                    Some(base) if path.is_relative() => base.join(path),
                    _ => path.clone(),
                };
                tracing::debug!(path = %path.display(), %encoding, "reading context file");
                let bytes = std::fs::read(&path).map_err(|e| read_err(&path, e))?;
                Ok(encoding.decode(&bytes))
            }
        }
    }
}

/// Return the raw context text for `spec`: the spec itself for an inline
/// document, the decoded file contents for a `file:` reference.
pub fn load_context_source(spec: &str, encoding: TextEncoding) -> Result<String, ContextError> {
    match ContextSpec::parse(spec)? {
        Some(parsed) => parsed.load(encoding, None),
        None => Err(ContextError::InvalidSpec {
            spec: spec.to_string(),
        }),
    }
}
