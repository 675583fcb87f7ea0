//! One template execution: template file, output path, optional local context.

use std::path::{Path, PathBuf};

use crate::error::PipelineError;

/// Immutable description of a single template run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfiguration {
    template_file: PathBuf,
    output_path: PathBuf,
    context: Option<String>,
}

impl RunConfiguration {
    /// Create a run with no local context.
    ///
    /// Both paths are required; an empty value is a
    /// [`PipelineError::MissingConfig`]. Whether the template exists is only
    /// checked when it is rendered.
    pub fn new(
        template_file: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Result<Self, PipelineError> {
        let template_file = template_file.into();
        let output_path = output_path.into();
        if template_file.as_os_str().is_empty() {
            return Err(PipelineError::MissingConfig {
                field: "template_file",
                index: None,
            });
        }
        if output_path.as_os_str().is_empty() {
            return Err(PipelineError::MissingConfig {
                field: "output_path",
                index: None,
            });
        }
        Ok(RunConfiguration {
            template_file,
            output_path,
            context: None,
        })
    }

    /// Attach a local context spec. An empty spec leaves the run inheriting.
    pub fn with_context(mut self, spec: impl Into<String>) -> Self {
        let spec = spec.into();
        self.context = (!spec.is_empty()).then_some(spec);
        self
    }

    pub fn template_file(&self) -> &Path {
        &self.template_file
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }
}
