pub mod context;
pub mod render;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use stanza_core::{ContextSpec, FILE_PREFIX};
use stanza_pipeline::{load_config_at, PipelineConfig};

use crate::PropertyArg;

/// Options shared by every subcommand that reads a configuration file.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Path to the YAML configuration file.
    #[arg(long, short = 'c', default_value = "stanza.yaml")]
    pub config: PathBuf,

    /// Define or override a substitution property.
    #[arg(short = 'D', long = "define", value_name = "NAME=VALUE")]
    pub defines: Vec<PropertyArg>,
}

impl ConfigArgs {
    pub fn load(&self) -> Result<PipelineConfig> {
        load_config_at(&self.config)
            .with_context(|| format!("failed to load '{}'", self.config.display()))
    }

    /// Properties from the file, with `-D` definitions taking precedence.
    pub fn properties(&self, config: &PipelineConfig) -> Result<BTreeMap<String, String>> {
        let mut properties = config.properties().context("invalid properties")?;
        for define in &self.defines {
            properties.insert(define.name.clone(), define.value.clone());
        }
        Ok(properties)
    }
}

/// Anchor a relative `file:` spec given on the command line at `cwd`.
///
/// Specs from the configuration file resolve against the file's directory;
/// specs typed at the prompt resolve against the working directory. Any other
/// shape is returned untouched and validated later.
pub fn anchor_context_spec(spec: String, cwd: &Path) -> String {
    match ContextSpec::parse(&spec) {
        Ok(Some(ContextSpec::File(path))) if path.is_relative() => {
            format!("{FILE_PREFIX}{}", cwd.join(path).display())
        }
        _ => spec,
    }
}
