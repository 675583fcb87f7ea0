//! # stanza-pipeline
//!
//! Multi-template orchestration: resolve the global context once, then render
//! each configured run in order against its effective context (the run's own
//! context if it has one, the global context otherwise).
//!
//! Call [`run`] for the common case, or build an [`Orchestrator`] to inject a
//! [`Reporter`], a base directory or strict property handling. A YAML
//! [`PipelineConfig`] can drive the whole pipeline via [`PipelineConfig::execute`].

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod report;
pub mod run_config;

pub use config::{load_config_at, PipelineConfig, TemplateEntry};
pub use error::PipelineError;
pub use orchestrator::{run, Orchestrator};
pub use report::{NullReporter, Reporter, RunEvent, TracingReporter};
pub use run_config::RunConfiguration;
