//! End-to-end pipeline behaviour: context fallback, override, fail-fast, and
//! configuration-file driven runs.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use assert_fs::prelude::*;
use stanza_core::TextEncoding;
use stanza_pipeline::{
    load_config_at, run, NullReporter, Orchestrator, PipelineError, Reporter, RunConfiguration,
    RunEvent,
};

fn no_props() -> BTreeMap<String, String> {
    BTreeMap::new()
}

fn template(dir: &assert_fs::TempDir, name: &str, content: &str) -> PathBuf {
    let child = dir.child(name);
    if let Some(parent) = child.path().parent() {
        fs::create_dir_all(parent).expect("mkdir");
    }
    child.write_str(content).expect("write template");
    child.path().to_path_buf()
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("read output")
}

/// Records a compact, ordered log of events.
#[derive(Default)]
struct Recorder(RefCell<Vec<String>>);

impl Reporter for Recorder {
    fn report(&self, event: &RunEvent<'_>) {
        let line = match event {
            RunEvent::Skipped => "skipped".to_string(),
            RunEvent::GlobalContextResolved { present } => format!("global:{present}"),
            RunEvent::RunStarted { index, total, .. } => format!("start:{index}/{total}"),
            RunEvent::UnresolvedProperty { name, .. } => format!("unresolved:{name}"),
            RunEvent::RunFinished { index, .. } => format!("finish:{index}"),
        };
        self.0.borrow_mut().push(line);
    }
}

// ---------------------------------------------------------------------------
// 1. Context resolution scenarios
// ---------------------------------------------------------------------------

#[test]
fn inline_local_context_renders() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let tpl = template(&dir, "test.tera", "{{text}}");
    let out = dir.path().join("out.txt");
    let runs = [RunConfiguration::new(&tpl, &out)
        .unwrap()
        .with_context("---\ntext: \"Hello test\"\n")];

    run(None, &runs, &no_props(), TextEncoding::utf8()).expect("run");
    assert_eq!(read(&out), "Hello test");
}

#[test]
fn file_local_context_renders() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let tpl = template(&dir, "test.tera", "{{text}}");
    let ctx_file = dir.child("context.yaml");
    ctx_file.write_str("text: Hello test\n").expect("write");
    let out = dir.path().join("out.txt");
    let runs = [RunConfiguration::new(&tpl, &out)
        .unwrap()
        .with_context(format!("file:{}", ctx_file.path().display()))];

    run(None, &runs, &no_props(), TextEncoding::utf8()).expect("run");
    assert_eq!(read(&out), "Hello test");
}

#[test]
fn run_without_local_context_uses_global() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let tpl = template(&dir, "test.tera", "{{text}}");
    let out = dir.path().join("out.txt");
    let runs = [RunConfiguration::new(&tpl, &out).unwrap()];

    run(Some("---\ntext: Hello test"), &runs, &no_props(), TextEncoding::utf8()).expect("run");
    assert_eq!(read(&out), "Hello test");
}

#[test]
fn local_context_overrides_global() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let tpl = template(&dir, "test.tera", "{{text}}");
    let out = dir.path().join("out.txt");
    let runs = [RunConfiguration::new(&tpl, &out)
        .unwrap()
        .with_context("---\ntext: Hello test")];

    run(
        Some("---\ntext: should not appear"),
        &runs,
        &no_props(),
        TextEncoding::utf8(),
    )
    .expect("run");
    assert_eq!(read(&out), "Hello test");
}

#[test]
fn override_does_not_merge_global_keys() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let tpl = template(&dir, "test.tera", "{{ text }}{% if extra is defined %}+{{ extra }}{% endif %}");
    let out = dir.path().join("out.txt");
    let runs = [RunConfiguration::new(&tpl, &out)
        .unwrap()
        .with_context("---\ntext: local")];

    run(
        Some("---\ntext: global\nextra: leaked"),
        &runs,
        &no_props(),
        TextEncoding::utf8(),
    )
    .expect("run");
    assert_eq!(read(&out), "local");
}

#[test]
fn unmarked_inline_context_fails_without_writing() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let tpl = template(&dir, "test.tera", "{{text}}");
    let out = dir.child("out.txt");
    out.write_str("untouched").expect("write");
    let runs = [RunConfiguration::new(&tpl, out.path())
        .unwrap()
        .with_context("{text : 'Hello test'}")];

    let err = run(None, &runs, &no_props(), TextEncoding::utf8()).unwrap_err();
    assert!(matches!(err, PipelineError::RunContext { index: 0, .. }), "got: {err}");
    assert_eq!(err.code(), "context.invalid_spec");
    assert_eq!(read(out.path()), "untouched");
}

#[test]
fn missing_context_file_fails_with_read_error() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let tpl = template(&dir, "test.tera", "{{text}}");
    let runs = [RunConfiguration::new(&tpl, dir.path().join("out.txt"))
        .unwrap()
        .with_context("file:/nonexistent/path.yaml")];

    let err = run(None, &runs, &no_props(), TextEncoding::utf8()).unwrap_err();
    assert_eq!(err.code(), "context.read");
    assert!(err.to_string().contains("cannot read context file"));
}

#[test]
fn properties_are_substituted_into_global_context() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let tpl = template(&dir, "v.tera", "{{ name }} {{ version }}");
    let out = dir.path().join("v.txt");
    let mut props = no_props();
    props.insert("project.name".into(), "stanza".into());
    props.insert("project.version".into(), "2.0.1".into());
    let runs = [RunConfiguration::new(&tpl, &out).unwrap()];

    run(
        Some("---\nname: ${project.name}\nversion: \"${project.version}\"\n"),
        &runs,
        &props,
        TextEncoding::utf8(),
    )
    .expect("run");
    assert_eq!(read(&out), "stanza 2.0.1");
}

// ---------------------------------------------------------------------------
// 2. Orchestration policy
// ---------------------------------------------------------------------------

#[test]
fn no_context_fails_before_touching_template_or_output() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let out = dir.path().join("never").join("out.txt");
    let runs = [RunConfiguration::new(dir.path().join("does-not-exist.tera"), &out).unwrap()];

    let err = run(None, &runs, &no_props(), TextEncoding::utf8()).unwrap_err();
    assert!(matches!(err, PipelineError::NoContext { index: 0, .. }), "got: {err}");
    assert!(err.to_string().contains("no context available"));
    assert!(!out.parent().unwrap().exists(), "output directory must not be created");
}

#[test]
fn first_failure_aborts_remaining_runs() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let good = template(&dir, "good.tera", "{{ text }}");
    let bad = template(&dir, "bad.tera", "{{ undefined_thing }}");
    let first = dir.path().join("1.txt");
    let third = dir.path().join("3.txt");
    let runs = [
        RunConfiguration::new(&good, &first).unwrap(),
        RunConfiguration::new(&bad, dir.path().join("2.txt")).unwrap(),
        RunConfiguration::new(&good, &third).unwrap(),
    ];

    let err = run(Some("---\ntext: ok"), &runs, &no_props(), TextEncoding::utf8()).unwrap_err();
    assert!(matches!(err, PipelineError::Render { index: 1, .. }), "got: {err}");
    assert_eq!(err.run_index(), Some(1));
    assert_eq!(read(&first), "ok");
    assert!(!third.exists(), "runs after a failure must not execute");
}

#[test]
fn events_are_reported_in_run_order() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let tpl = template(&dir, "t.tera", "{{ v }}");
    let runs = [
        RunConfiguration::new(&tpl, dir.path().join("a.txt")).unwrap(),
        RunConfiguration::new(&tpl, dir.path().join("b.txt"))
            .unwrap()
            .with_context("---\nv: ${missing}"),
    ];
    let props = no_props();
    let recorder = Recorder::default();

    let outcomes = Orchestrator::new(&props, TextEncoding::utf8(), &recorder)
        .run(Some("---\nv: global"), &runs)
        .expect("run");

    assert_eq!(outcomes.len(), 2);
    assert_eq!(read(&outcomes[1].output), "${missing}");
    assert_eq!(
        *recorder.0.borrow(),
        vec![
            "global:true",
            "start:0/2",
            "finish:0",
            "start:1/2",
            "unresolved:missing",
            "finish:1",
        ]
    );
}

#[test]
fn strict_mode_turns_missing_property_into_failure() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let tpl = template(&dir, "t.tera", "{{ v }}");
    let runs = [RunConfiguration::new(&tpl, dir.path().join("a.txt")).unwrap()];
    let props = no_props();

    let err = Orchestrator::new(&props, TextEncoding::utf8(), &NullReporter)
        .strict(true)
        .run(Some("---\nv: ${missing}"), &runs)
        .unwrap_err();
    assert!(matches!(err, PipelineError::GlobalContext(_)), "got: {err}");
    assert_eq!(err.code(), "context.unresolved_properties");
}

#[test]
fn invalid_global_context_fails_even_without_runs() {
    let props = no_props();
    let recorder = Recorder::default();
    let err = Orchestrator::new(&props, TextEncoding::utf8(), &recorder)
        .run(Some("not a context"), &[])
        .unwrap_err();
    assert_eq!(err.code(), "context.invalid_spec");
    assert!(recorder.0.borrow().is_empty());
}

#[test]
fn whitespace_only_local_context_is_invalid_not_inherited() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let tpl = template(&dir, "t.tera", "{{ text }}");
    let out = dir.path().join("out.txt");
    let runs = [RunConfiguration::new(&tpl, &out).unwrap().with_context("  \n")];

    let err = run(Some("---\ntext: global\n"), &runs, &no_props(), TextEncoding::utf8())
        .unwrap_err();
    assert!(matches!(err, PipelineError::RunContext { index: 0, .. }), "got: {err}");
    assert_eq!(err.code(), "context.invalid_spec");
    assert!(!out.exists());
}

// ---------------------------------------------------------------------------
// 3. Configuration files
// ---------------------------------------------------------------------------

#[test]
fn config_file_drives_all_runs() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    template(&dir, "templates/readme.tera", "# {{ name }} {{ version }}");
    template(&dir, "templates/notes.tera", "{% for n in notes %}* {{ n }}\n{% endfor %}");
    dir.child("context.yaml")
        .write_str("name: ${project.name}\nversion: \"${project.version}\"\n")
        .expect("write");
    let config_file = dir.child("stanza.yaml");
    config_file
        .write_str(
            "encoding: utf-8\n\
             context: \"file:context.yaml\"\n\
             properties:\n  project.name: stanza\n  project.version: 0.3\n\
             templates:\n\
             \x20 - template_file: templates/readme.tera\n\
             \x20   output_path: out/README.md\n\
             \x20 - template_file: templates/notes.tera\n\
             \x20   output_path: out/docs/NOTES.md\n\
             \x20   context: \"---\\nnotes: [a, b]\\n\"\n",
        )
        .expect("write");

    let config = load_config_at(config_file.path()).expect("load");
    let props = config.properties().expect("properties");
    let outcomes = config.execute(&props, &NullReporter).expect("execute");

    assert_eq!(outcomes.len(), 2);
    assert_eq!(read(&dir.path().join("out/README.md")), "# stanza 0.3");
    assert_eq!(read(&dir.path().join("out/docs/NOTES.md")), "* a\n* b\n");
}

#[test]
fn skipped_config_renders_nothing() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let config_file = dir.child("stanza.yaml");
    config_file
        .write_str(
            "skip: true\ntemplates:\n  - template_file: missing.tera\n    output_path: out.txt\n",
        )
        .expect("write");
    let recorder = Recorder::default();

    let config = load_config_at(config_file.path()).expect("load");
    let outcomes = config.execute(&no_props(), &recorder).expect("execute");
    assert!(outcomes.is_empty());
    assert_eq!(*recorder.0.borrow(), vec!["skipped"]);
    assert!(!dir.path().join("out.txt").exists());
}

#[test]
fn missing_config_file_is_reported() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let err = load_config_at(&dir.path().join("stanza.yaml")).unwrap_err();
    assert!(matches!(err, PipelineError::ConfigNotFound { .. }), "got: {err}");
}

#[test]
fn malformed_config_reports_path() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let config_file = dir.child("stanza.yaml");
    config_file.write_str("templates: [unclosed").expect("write");
    let err = load_config_at(config_file.path()).unwrap_err();
    assert_eq!(err.code(), "config.parse");
    assert!(err.to_string().contains("stanza.yaml"));
}
