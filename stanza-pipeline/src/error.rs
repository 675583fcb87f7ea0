//! Error types for stanza-pipeline.

use std::path::PathBuf;

use thiserror::Error;

use stanza_core::ContextError;
use stanza_renderer::RenderError;

/// All errors that can abort a pipeline invocation.
///
/// Failures tied to one run carry its zero-based `index` and template path.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Neither the run nor the invocation supplies a context.
    #[error("no context available for this template run (run {index}: {template})")]
    NoContext { index: usize, template: PathBuf },

    /// A required configuration value is absent or empty.
    #[error("missing required configuration value '{field}'{}", run_suffix(.index))]
    MissingConfig {
        field: &'static str,
        index: Option<usize>,
    },

    /// A configured property is not a scalar.
    #[error("property '{name}' must be a string, number or boolean")]
    InvalidProperty { name: String },

    /// The global context could not be resolved.
    #[error("global context: {0}")]
    GlobalContext(#[source] ContextError),

    /// A run's local context could not be resolved.
    #[error("context for run {index} ({template}): {source}")]
    RunContext {
        index: usize,
        template: PathBuf,
        #[source]
        source: ContextError,
    },

    /// A run's template could not be rendered.
    #[error("render of run {index} failed: {source}")]
    Render {
        index: usize,
        #[source]
        source: RenderError,
    },

    /// The configured encoding label is unknown.
    #[error("encoding: {0}")]
    Encoding(#[source] ContextError),

    /// The configuration file does not exist.
    #[error("configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// The configuration file exists but cannot be read.
    #[error("cannot read configuration at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for [`crate::PipelineConfig`].
    #[error("failed to parse configuration at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

fn run_suffix(index: &Option<usize>) -> String {
    index.map(|i| format!(" in run {i}")).unwrap_or_default()
}

impl PipelineError {
    /// Short machine-oriented code; context and render failures keep the code
    /// of their underlying cause.
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::NoContext { .. } => "orchestration.no_context",
            PipelineError::MissingConfig { .. } => "orchestration.missing_config",
            PipelineError::InvalidProperty { .. } => "orchestration.invalid_property",
            PipelineError::GlobalContext(source) => source.code(),
            PipelineError::RunContext { source, .. } => source.code(),
            PipelineError::Render { source, .. } => source.code(),
            PipelineError::Encoding(source) => source.code(),
            PipelineError::ConfigNotFound { .. } => "config.not_found",
            PipelineError::ConfigRead { .. } => "config.read",
            PipelineError::ConfigParse { .. } => "config.parse",
        }
    }

    /// Zero-based index of the run this failure belongs to, if any.
    pub fn run_index(&self) -> Option<usize> {
        match self {
            PipelineError::NoContext { index, .. }
            | PipelineError::RunContext { index, .. }
            | PipelineError::Render { index, .. } => Some(*index),
            PipelineError::MissingConfig { index, .. } => *index,
            _ => None,
        }
    }
}
