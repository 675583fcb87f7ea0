//! YAML pipeline configuration.
//!
//! ```yaml
//! encoding: utf-8
//! strict_properties: false
//! context: "file:context.yaml"
//! properties:
//!   project.version: 1.4.0
//! templates:
//!   - template_file: templates/README.md.tera
//!     output_path: README.md
//!   - template_file: templates/CHANGELOG.md.tera
//!     output_path: docs/CHANGELOG.md
//!     context: |
//!       ---
//!       release: ${project.version}
//! ```
//!
//! Relative paths (templates, outputs and `file:` contexts) are resolved
//! against the directory that contains the configuration file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::Value;

use stanza_core::{PropertySource, TextEncoding};
use stanza_renderer::RenderOutcome;

use crate::error::PipelineError;
use crate::orchestrator::Orchestrator;
use crate::report::{Reporter, RunEvent};
use crate::run_config::RunConfiguration;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Character set label; UTF-8 with a warning when unset.
    #[serde(default)]
    pub encoding: Option<String>,
    /// Render nothing when set.
    #[serde(default)]
    pub skip: bool,
    /// Fail on `${name}` placeholders with no matching property.
    #[serde(default)]
    pub strict_properties: bool,
    /// Global context spec shared by runs without their own.
    #[serde(default)]
    pub context: Option<String>,
    /// Properties available to `${name}` substitution. Scalars only.
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
    #[serde(default)]
    pub templates: Vec<TemplateEntry>,
    /// Directory relative paths are resolved against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

/// One `templates:` entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateEntry {
    #[serde(default)]
    pub template_file: Option<PathBuf>,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
}

/// Load a configuration file; its parent directory becomes the base directory.
pub fn load_config_at(path: &Path) -> Result<PipelineConfig, PipelineError> {
    if !path.exists() {
        return Err(PipelineError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|source| PipelineError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config = PipelineConfig::from_yaml(&contents).map_err(|source| {
        PipelineError::ConfigParse {
            path: path.to_path_buf(),
            source,
        }
    })?;
    config.base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    Ok(config)
}

impl PipelineConfig {
    /// Parse configuration text. The base directory is left empty (current directory).
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file is an empty configuration, not a parse error.
        if text.trim().is_empty() {
            return Ok(PipelineConfig::default());
        }
        serde_yaml::from_str(text)
    }

    pub fn encoding(&self) -> Result<TextEncoding, PipelineError> {
        TextEncoding::resolve(self.encoding.as_deref()).map_err(PipelineError::Encoding)
    }

    /// Configured properties as strings. Numbers and booleans are stringified.
    pub fn properties(&self) -> Result<BTreeMap<String, String>, PipelineError> {
        self.properties
            .iter()
            .map(|(name, value)| {
                let text = match value {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    Value::Null => String::new(),
                    _ => return Err(PipelineError::InvalidProperty { name: name.clone() }),
                };
                Ok((name.clone(), text))
            })
            .collect()
    }

    /// Validated runs, with relative paths joined onto [`Self::base_dir`].
    pub fn runs(&self) -> Result<Vec<RunConfiguration>, PipelineError> {
        self.templates
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let template = entry
                    .template_file
                    .as_ref()
                    .filter(|p| !p.as_os_str().is_empty())
                    .ok_or(PipelineError::MissingConfig {
                        field: "template_file",
                        index: Some(index),
                    })?;
                let output = entry
                    .output_path
                    .as_deref()
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .ok_or(PipelineError::MissingConfig {
                        field: "output_path",
                        index: Some(index),
                    })?;
                let run = RunConfiguration::new(
                    self.base_dir.join(template),
                    self.base_dir.join(output),
                )?;
                Ok(match &entry.context {
                    Some(spec) => run.with_context(spec.clone()),
                    None => run,
                })
            })
            .collect()
    }

    /// Run the configured pipeline.
    ///
    /// `properties` is the complete property set to substitute with; callers
    /// merge [`Self::properties`] with any overrides before calling.
    pub fn execute<P: PropertySource + ?Sized>(
        &self,
        properties: &P,
        reporter: &dyn Reporter,
    ) -> Result<Vec<RenderOutcome>, PipelineError> {
        if self.skip {
            reporter.report(&RunEvent::Skipped);
            return Ok(Vec::new());
        }
        let encoding = self.encoding()?;
        let runs = self.runs()?;
        Orchestrator::new(properties, encoding, reporter)
            .with_base_dir(self.base_dir.clone())
            .strict(self.strict_properties)
            .run(self.context.as_deref(), &runs)
    }
}
