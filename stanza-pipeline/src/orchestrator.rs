//! Orchestration of an ordered list of template runs.
//!
//! ## Execution
//!
//! 1. Resolve the global context once.
//! 2. For each run, in order: report start, resolve the local context, pick the
//!    effective context (local replaces global wholesale), render.
//! 3. The first failure aborts the invocation; later runs are not attempted.

use std::borrow::Cow;
use std::path::PathBuf;

use stanza_core::{ContextResolver, PropertySource, ResolvedContext, TextEncoding};
use stanza_renderer::{RenderOutcome, TemplateRenderer};

use crate::error::PipelineError;
use crate::report::{Reporter, RunEvent, TracingReporter};
use crate::run_config::RunConfiguration;

/// Sequential, fail-fast runner for [`RunConfiguration`]s.
pub struct Orchestrator<'a, P: PropertySource + ?Sized> {
    resolver: ContextResolver<'a, P>,
    renderer: TemplateRenderer,
    reporter: &'a dyn Reporter,
}

impl<'a, P: PropertySource + ?Sized> Orchestrator<'a, P> {
    pub fn new(properties: &'a P, encoding: TextEncoding, reporter: &'a dyn Reporter) -> Self {
        Orchestrator {
            resolver: ContextResolver::new(properties, encoding),
            renderer: TemplateRenderer::new(encoding),
            reporter,
        }
    }

    /// Resolve relative `file:` context references against `base_dir`.
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.resolver = self.resolver.with_base_dir(base_dir);
        self
    }

    /// Treat unresolved `${name}` placeholders as context failures.
    pub fn strict(mut self, strict: bool) -> Self {
        self.resolver = self.resolver.strict(strict);
        self
    }

    /// Resolve the invocation-wide fallback context.
    pub fn resolve_global(
        &self,
        spec: Option<&str>,
    ) -> Result<Option<ResolvedContext>, PipelineError> {
        let global = self
            .resolver
            .resolve(spec)
            .map_err(PipelineError::GlobalContext)?;
        if let Some(ctx) = &global {
            for name in ctx.unresolved_properties() {
                self.reporter.report(&RunEvent::UnresolvedProperty { index: None, name });
            }
        }
        self.reporter.report(&RunEvent::GlobalContextResolved {
            present: global.is_some(),
        });
        Ok(global)
    }

    /// Pick the context `run` renders against: its own if it has one,
    /// otherwise `global`. Fails when neither exists, before any file I/O.
    pub fn effective_context<'g>(
        &self,
        index: usize,
        run: &RunConfiguration,
        global: Option<&'g ResolvedContext>,
    ) -> Result<Cow<'g, ResolvedContext>, PipelineError> {
        if run.context().is_none() {
            return global.map(Cow::Borrowed).ok_or_else(|| PipelineError::NoContext {
                index,
                template: run.template_file().to_path_buf(),
            });
        }

        let local = self
            .resolver
            .resolve(run.context())
            .map_err(|source| PipelineError::RunContext {
                index,
                template: run.template_file().to_path_buf(),
                source,
            })?;
        match local {
            Some(ctx) => {
                for name in ctx.unresolved_properties() {
                    self.reporter.report(&RunEvent::UnresolvedProperty {
                        index: Some(index),
                        name,
                    });
                }
                Ok(Cow::Owned(ctx))
            }
            None => global.map(Cow::Borrowed).ok_or_else(|| PipelineError::NoContext {
                index,
                template: run.template_file().to_path_buf(),
            }),
        }
    }

    /// Render every run in order against its effective context.
    pub fn run(
        &self,
        global_spec: Option<&str>,
        runs: &[RunConfiguration],
    ) -> Result<Vec<RenderOutcome>, PipelineError> {
        let global = self.resolve_global(global_spec)?;
        let total = runs.len();
        let mut outcomes = Vec::with_capacity(total);

        for (index, run) in runs.iter().enumerate() {
            self.reporter.report(&RunEvent::RunStarted {
                index,
                total,
                template: run.template_file(),
                output: run.output_path(),
            });

            let context = self.effective_context(index, run, global.as_ref())?;
            let outcome = self
                .renderer
                .render(run.template_file(), &context, run.output_path())
                .map_err(|source| PipelineError::Render { index, source })?;

            self.reporter.report(&RunEvent::RunFinished {
                index,
                output: &outcome.output,
                bytes: outcome.bytes,
            });
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }
}

/// Render `runs` with default options, logging progress through `tracing`.
pub fn run<P: PropertySource + ?Sized>(
    global_spec: Option<&str>,
    runs: &[RunConfiguration],
    properties: &P,
    encoding: TextEncoding,
) -> Result<Vec<RenderOutcome>, PipelineError> {
    Orchestrator::new(properties, encoding, &TracingReporter).run(global_spec, runs)
}
