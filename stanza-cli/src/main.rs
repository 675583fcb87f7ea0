//! stanza — render templates against YAML contexts.
//!
//! # Usage
//!
//! ```text
//! stanza render  [--config stanza.yaml] [-D name=value]... [--encoding LABEL] [--context SPEC] [--strict]
//! stanza context [--config stanza.yaml] [-D name=value]... [--run N] [--json]
//! ```

mod commands;

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{context::ContextArgs, render::RenderArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "stanza",
    version,
    about = "Render templates against YAML contexts with ${property} substitution",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render every configured template to its output file.
    Render(RenderArgs),

    /// Print the resolved context (global, or one run's effective context).
    Context(ContextArgs),
}

// ---------------------------------------------------------------------------
// Shared `-D name=value` argument
// ---------------------------------------------------------------------------

/// A property definition parsed from `name=value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyArg {
    pub name: String,
    pub value: String,
}

impl FromStr for PropertyArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => Ok(PropertyArg {
                name: name.trim().to_string(),
                value: value.to_string(),
            }),
            _ => Err(format!("invalid property '{s}'; expected NAME=VALUE")),
        }
    }
}

impl fmt::Display for PropertyArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Render(args) => args.run(),
        Commands::Context(args) => args.run(),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
