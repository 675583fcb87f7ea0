//! `stanza render` — render every configured template.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use stanza_pipeline::{Reporter, RunEvent};

use super::{anchor_context_spec, ConfigArgs};

/// Arguments for `stanza render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Character set for reading contexts/templates and writing outputs.
    #[arg(long, value_name = "LABEL")]
    pub encoding: Option<String>,

    /// Global context spec (`---\n...` or `file:<path>`), replacing the file's.
    /// A relative `file:` path is resolved against the current directory.
    #[arg(long, value_name = "SPEC")]
    pub context: Option<String>,

    /// Fail when a `${name}` placeholder has no matching property.
    #[arg(long)]
    pub strict: bool,
}

impl RenderArgs {
    pub fn run(self) -> Result<()> {
        let mut config = self.config.load()?;
        if let Some(encoding) = self.encoding {
            config.encoding = Some(encoding);
        }
        if let Some(context) = self.context {
            let cwd = std::env::current_dir().context("cannot determine current directory")?;
            config.context = Some(anchor_context_spec(context, &cwd));
        }
        config.strict_properties |= self.strict;

        let properties = self.config.properties(&config)?;
        let outcomes = config
            .execute(&properties, &ConsoleReporter)
            .with_context(|| format!("render failed for '{}'", self.config.config.display()))?;

        if !config.skip {
            println!("✓ {} template(s) rendered", outcomes.len());
        }
        Ok(())
    }
}

/// Prints run progress to stdout.
struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&self, event: &RunEvent<'_>) {
        match event {
            RunEvent::Skipped => println!("{}", "Skipping template rendering".dimmed()),
            RunEvent::RunStarted {
                index,
                total,
                template,
                output,
            } => println!(
                "[{}/{}] {} → {}",
                index + 1,
                total,
                display(template),
                display(output).bold()
            ),
            RunEvent::RunFinished { output, bytes, .. } => {
                println!("  {}  {} ({bytes} bytes)", "✎".green(), display(output))
            }
            RunEvent::GlobalContextResolved { .. } | RunEvent::UnresolvedProperty { .. } => {}
        }
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
