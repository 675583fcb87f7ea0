//! Context resolution: spec → raw text → substituted text → YAML value.

use std::path::{Path, PathBuf};

use serde_yaml::Value;

use crate::encoding::TextEncoding;
use crate::error::ContextError;
use crate::properties::{substitute, PropertySource};
use crate::spec::ContextSpec;

/// A parsed context, ready to bind into a template.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedContext {
    value: Value,
    unresolved: Vec<String>,
}

impl ResolvedContext {
    pub fn new(value: Value) -> Self {
        ResolvedContext {
            value,
            unresolved: Vec::new(),
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// Placeholders left in the source because no property defined them.
    pub fn unresolved_properties(&self) -> &[String] {
        &self.unresolved
    }
}

/// Resolves context specs against one property set and encoding.
pub struct ContextResolver<'a, P: PropertySource + ?Sized> {
    properties: &'a P,
    encoding: TextEncoding,
    base_dir: Option<PathBuf>,
    strict: bool,
}

impl<'a, P: PropertySource + ?Sized> ContextResolver<'a, P> {
    pub fn new(properties: &'a P, encoding: TextEncoding) -> Self {
        ContextResolver {
            properties,
            encoding,
            base_dir: None,
            strict: false,
        }
    }

    /// Directory that relative `file:` references are resolved against.
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    /// Fail instead of warning when a placeholder has no matching property.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    /// Resolve `spec` into a context value.
    ///
    /// `None` or an empty spec yields `Ok(None)` without touching the filesystem.
    pub fn resolve(&self, spec: Option<&str>) -> Result<Option<ResolvedContext>, ContextError> {
        let Some(parsed) = spec.map(ContextSpec::parse).transpose()?.flatten() else {
            return Ok(None);
        };
        let source = parsed.load(self.encoding, self.base_dir())?;
        let substituted = substitute(&source, self.properties);
        if self.strict && !substituted.unresolved.is_empty() {
            return Err(ContextError::UnresolvedProperties {
                names: substituted.unresolved,
            });
        }
        let value: Value = serde_yaml::from_str(&substituted.text)
            .map_err(|source| ContextError::Parse { source })?;
        Ok(Some(ResolvedContext {
            value,
            unresolved: substituted.unresolved,
        }))
    }
}

/// Resolve `spec` with default options (no base directory, non-strict).
pub fn resolve_context<P: PropertySource + ?Sized>(
    spec: Option<&str>,
    properties: &P,
    encoding: TextEncoding,
) -> Result<Option<ResolvedContext>, ContextError> {
    ContextResolver::new(properties, encoding).resolve(spec)
}
