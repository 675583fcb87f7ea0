//! Error types for stanza-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while locating, reading or parsing a context.
#[derive(Debug, Error)]
pub enum ContextError {
    /// The spec is neither an inline document nor a `file:` reference.
    #[error(
        "invalid context specification {spec:?}: expected an inline YAML document starting \
         with '---\\n' or a 'file:<path>' reference"
    )]
    InvalidSpec { spec: String },

    /// The referenced context file is missing or unreadable.
    #[error("cannot read context file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The (substituted) context text is not valid YAML.
    #[error("cannot parse context: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
    },

    /// Strict mode only: placeholders whose property is not defined.
    #[error("unresolved properties in context: {}", .names.join(", "))]
    UnresolvedProperties { names: Vec<String> },

    /// The configured character set label is not recognised.
    #[error("unknown encoding '{label}'")]
    UnknownEncoding { label: String },

    /// The character set can be read but not written in the same encoding.
    #[error("encoding '{label}' ({encoding}) cannot be used to write output")]
    UnsupportedEncoding {
        label: String,
        encoding: &'static str,
    },
}

impl ContextError {
    /// Short machine-oriented code for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            ContextError::InvalidSpec { .. } => "context.invalid_spec",
            ContextError::Read { .. } => "context.read",
            ContextError::Parse { .. } => "context.parse",
            ContextError::UnresolvedProperties { .. } => "context.unresolved_properties",
            ContextError::UnknownEncoding { .. } => "context.unknown_encoding",
            ContextError::UnsupportedEncoding { .. } => "context.unsupported_encoding",
        }
    }
}

pub(crate) fn read_err(path: impl Into<PathBuf>, source: std::io::Error) -> ContextError {
    ContextError::Read {
        path: path.into(),
        source,
    }
}
