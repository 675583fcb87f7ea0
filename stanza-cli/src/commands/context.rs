//! `stanza context` — print a resolved context.

use anyhow::{Context, Result};
use clap::Args;

use stanza_pipeline::{NullReporter, Orchestrator};

use super::ConfigArgs;

/// Arguments for `stanza context`.
#[derive(Args, Debug)]
pub struct ContextArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Zero-based run index; prints that run's effective context instead of the global one.
    #[arg(long, value_name = "N")]
    pub run: Option<usize>,

    /// Emit JSON instead of YAML.
    #[arg(long)]
    pub json: bool,
}

impl ContextArgs {
    pub fn run(self) -> Result<()> {
        let config = self.config.load()?;
        let properties = self.config.properties(&config)?;
        let orchestrator = Orchestrator::new(&properties, config.encoding()?, &NullReporter)
            .with_base_dir(config.base_dir.clone())
            .strict(config.strict_properties);

        let global = orchestrator.resolve_global(config.context.as_deref())?;
        let context = match self.run {
            Some(index) => {
                let runs = config.runs()?;
                let run = runs
                    .get(index)
                    .with_context(|| format!("no run {index}; {} run(s) configured", runs.len()))?;
                orchestrator
                    .effective_context(index, run, global.as_ref())?
                    .into_owned()
            }
            None => global.context("no global context configured")?,
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(context.value())?);
        } else {
            print!("{}", serde_yaml::to_string(context.value())?);
        }
        Ok(())
    }
}
