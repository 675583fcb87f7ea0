//! Error types for stanza-renderer.

use std::error::Error as _;
use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while rendering a template to disk.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Template (or a partial it references) is missing or unreadable.
    #[error("cannot open template {path}: {source}")]
    OpenTemplate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Parent directory of the output path could not be created.
    #[error("output directory {path} cannot be created: {source}")]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output file could not be opened for writing.
    #[error("cannot open output file {path}: {source}")]
    OpenOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tera failed to compile or execute the template.
    #[error("cannot process template {path}: {message}")]
    Process {
        path: PathBuf,
        message: String,
        #[source]
        source: tera::Error,
    },

    /// The context value could not be converted into template variables.
    #[error("cannot bind context into template {path}: {source}")]
    Bind {
        path: PathBuf,
        #[source]
        source: tera::Error,
    },

    /// Flushing rendered output failed.
    #[error("cannot write output file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    /// Short machine-oriented code for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            RenderError::OpenTemplate { .. } => "render.open_template",
            RenderError::CreateOutputDir { .. } => "render.create_output_dir",
            RenderError::OpenOutput { .. } => "render.open_output",
            RenderError::Process { .. } => "render.process",
            RenderError::Bind { .. } => "render.bind",
            RenderError::Write { .. } => "render.write",
        }
    }
}

/// Build a [`RenderError::Process`], flattening Tera's error chain into the message.
pub(crate) fn process_err(path: impl Into<PathBuf>, source: tera::Error) -> RenderError {
    let mut message = source.to_string();
    let mut cause = source.source();
    while let Some(err) = cause {
        message.push_str(": ");
        message.push_str(&err.to_string());
        cause = err.source();
    }
    RenderError::Process {
        path: path.into(),
        message,
        source,
    }
}

pub(crate) fn template_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::OpenTemplate {
        path: path.into(),
        source,
    }
}
