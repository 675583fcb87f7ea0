//! Progress reporting, decoupled from resolution and rendering.
//!
//! The orchestrator emits [`RunEvent`]s to an injected [`Reporter`]. Reporters
//! observe only; they cannot change the outcome of a run.

use std::path::Path;

/// Something the pipeline did or is about to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent<'a> {
    /// The invocation is configured to skip and rendered nothing.
    Skipped,
    /// The global context was resolved (`present` is false when none was configured).
    GlobalContextResolved { present: bool },
    /// A run is about to start.
    RunStarted {
        index: usize,
        total: usize,
        template: &'a Path,
        output: &'a Path,
    },
    /// A placeholder had no matching property. `index` is `None` for the global context.
    UnresolvedProperty { index: Option<usize>, name: &'a str },
    /// A run wrote its output.
    RunFinished {
        index: usize,
        output: &'a Path,
        bytes: u64,
    },
}

/// Receives pipeline progress events.
pub trait Reporter {
    fn report(&self, event: &RunEvent<'_>);
}

impl<F> Reporter for F
where
    F: Fn(&RunEvent<'_>),
{
    fn report(&self, event: &RunEvent<'_>) {
        self(event)
    }
}

/// Logs every event through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: &RunEvent<'_>) {
        match event {
            RunEvent::Skipped => tracing::info!("template rendering is skipped"),
            RunEvent::GlobalContextResolved { present } => {
                tracing::debug!(present, "global context resolved")
            }
            RunEvent::RunStarted {
                index,
                total,
                template,
                output,
            } => tracing::info!(
                run = index + 1,
                total,
                template = %template.display(),
                output = %output.display(),
                "rendering template"
            ),
            RunEvent::UnresolvedProperty { index, name } => {
                tracing::warn!(run = ?index, property = name, "unresolved property in context")
            }
            RunEvent::RunFinished {
                index,
                output,
                bytes,
            } => tracing::debug!(run = index + 1, output = %output.display(), bytes, "wrote output"),
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn report(&self, _event: &RunEvent<'_>) {}
}
