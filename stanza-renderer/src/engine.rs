//! Template compilation and rendering to disk.
//!
//! # Partials
//!
//! Templates may pull in other templates with `{% include "name" %}`,
//! `{% include ["first", "fallback"] %}`, `{% extends "name" %}` or
//! `{% import "name" as m %}`. Every `name` is a path
//! relative to the directory that contains the top-level template; referenced
//! files are loaded recursively before compilation. A reference that does not
//! exist on disk is left for Tera to report (or ignore, with `ignore missing`).

use std::collections::{BTreeSet, VecDeque};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tera::Tera;

use stanza_core::{ResolvedContext, TextEncoding};

use crate::context::tera_context;
use crate::error::{process_err, template_err, RenderError};

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

/// A reference tag followed by a quoted name or a bracketed list of names.
fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"\{%-?\s*(?:include|extends|import)\s+(\[[^\]]*\]|"[^"]+"|'[^']+')"#)
            .expect("reference pattern is valid")
    })
}

fn quoted_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#""([^"]+)"|'([^']+)'"#).expect("quoted name pattern is valid")
    })
}

fn normalize_template_name(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn read_template(path: &Path, encoding: TextEncoding) -> Result<String, RenderError> {
    let bytes = std::fs::read(path).map_err(|e| template_err(path, e))?;
    Ok(encoding.decode(&bytes))
}

/// Load the template plus every partial it (transitively) references.
///
/// Returns `(name, source)` pairs; the first entry is the top-level template.
fn load_templates(
    template_file: &Path,
    encoding: TextEncoding,
) -> Result<Vec<(String, String)>, RenderError> {
    let base_dir = template_file.parent().unwrap_or_else(|| Path::new(""));
    let main_name = template_file
        .file_name()
        .map(|n| normalize_template_name(Path::new(n)))
        .unwrap_or_else(|| normalize_template_name(template_file));

    let main_source = read_template(template_file, encoding)?;
    let mut seen: BTreeSet<String> = BTreeSet::from([main_name.clone()]);
    let mut pending: VecDeque<String> = VecDeque::new();
    queue_references(&main_source, &mut seen, &mut pending);

    let mut templates = vec![(main_name, main_source)];
    while let Some(name) = pending.pop_front() {
        let path = base_dir.join(&name);
        if !path.is_file() {
            tracing::debug!(partial = %name, "referenced template not found on disk");
            continue;
        }
        let source = read_template(&path, encoding)?;
        queue_references(&source, &mut seen, &mut pending);
        templates.push((name, source));
    }
    Ok(templates)
}

fn queue_references(source: &str, seen: &mut BTreeSet<String>, pending: &mut VecDeque<String>) {
    for reference in reference_pattern().captures_iter(source) {
        for quoted in quoted_name_pattern().captures_iter(&reference[1]) {
            let Some(raw) = quoted.get(1).or_else(|| quoted.get(2)) else {
                continue;
            };
            let name = normalize_template_name(Path::new(raw.as_str()));
            if seen.insert(name.clone()) {
                pending.push_back(name);
            }
        }
    }
}

fn build_tera(template_file: &Path, encoding: TextEncoding) -> Result<(Tera, String), RenderError> {
    let templates = load_templates(template_file, encoding)?;
    let main_name = templates[0].0.clone();
    let mut tera = Tera::default();
    tera.add_raw_templates(templates)
        .map_err(|e| process_err(template_file, e))?;
    Ok((tera, main_name))
}

// ---------------------------------------------------------------------------
// TemplateRenderer
// ---------------------------------------------------------------------------

/// Result of a successful render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
    pub output: PathBuf,
    pub bytes: u64,
}

/// Renders template files with Tera, reading and writing in one encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRenderer {
    encoding: TextEncoding,
}

impl TemplateRenderer {
    pub fn new(encoding: TextEncoding) -> Self {
        TemplateRenderer { encoding }
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Compile `template_file`, then render it against `context` into `output_path`.
    ///
    /// The template is compiled before the output file is touched, so compile
    /// errors never truncate an existing output. Execution errors may leave a
    /// partially written file behind.
    pub fn render(
        &self,
        template_file: &Path,
        context: &ResolvedContext,
        output_path: &Path,
    ) -> Result<RenderOutcome, RenderError> {
        let (tera, name) = build_tera(template_file, self.encoding)?;
        let tera_ctx = tera_context(context).map_err(|source| RenderError::Bind {
            path: template_file.to_path_buf(),
            source,
        })?;

        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.is_dir() {
                std::fs::create_dir_all(parent).map_err(|source| RenderError::CreateOutputDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let file = File::create(output_path).map_err(|source| RenderError::OpenOutput {
            path: output_path.to_path_buf(),
            source,
        })?;
        let mut out = BufWriter::new(file);

        let bytes = if self.encoding.is_utf8() {
            let mut counter = CountingWriter::new(&mut out);
            tera.render_to(&name, &tera_ctx, &mut counter)
                .map_err(|e| process_err(template_file, e))?;
            counter.count
        } else {
            let text = tera
                .render(&name, &tera_ctx)
                .map_err(|e| process_err(template_file, e))?;
            let encoded = self.encoding.encode(&text);
            out.write_all(&encoded).map_err(|source| RenderError::Write {
                path: output_path.to_path_buf(),
                source,
            })?;
            encoded.len() as u64
        };

        out.flush().map_err(|source| RenderError::Write {
            path: output_path.to_path_buf(),
            source,
        })?;

        tracing::debug!(
            template = %template_file.display(),
            output = %output_path.display(),
            bytes,
            "rendered template"
        );
        Ok(RenderOutcome {
            output: output_path.to_path_buf(),
            bytes,
        })
    }
}

/// Render with a one-off [`TemplateRenderer`].
pub fn render(
    template_file: &Path,
    context: &ResolvedContext,
    output_path: &Path,
    encoding: TextEncoding,
) -> Result<RenderOutcome, RenderError> {
    TemplateRenderer::new(encoding).render(template_file, context, output_path)
}

struct CountingWriter<W> {
    inner: W,
    count: u64,
}

impl<W> CountingWriter<W> {
    fn new(inner: W) -> Self {
        CountingWriter { inner, count: 0 }
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
