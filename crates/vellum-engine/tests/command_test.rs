#![cfg(unix)]

use std::{fs, os::unix::fs::PermissionsExt, path::PathBuf};

use tempfile::TempDir;

use vellum::{
    engine::RenderEngine,
    generation::{Generation, RenderId},
    templates::templates,
};
use vellum_engine::{CommandEngine, EngineConfig};

/// Shell script standing in for `mmdc`.
///
/// Copies the input into an `<svg>` element tagged with the requested id and
/// theme. Input containing `explode` fails the way Mermaid reports a parse
/// error.
const FAKE_RENDERER: &str = r#"#!/bin/sh
input=""
output=""
id=""
theme=""
while [ $# -gt 0 ]; do
  case "$1" in
    --input) input="$2"; shift ;;
    --output) output="$2"; shift ;;
    --svgId) id="$2"; shift ;;
    --theme) theme="$2"; shift ;;
  esac
  shift
done
if grep -q explode "$input"; then
  echo "Error: Parse error on line 2:" >&2
  echo "...explode" >&2
  echo "    at Parser.parseError (mermaid.js:1:2)" >&2
  exit 1
fi
printf '<svg id="%s" data-theme="%s">' "$id" "$theme" > "$output"
cat "$input" >> "$output"
printf '</svg>' >> "$output"
"#;

fn fake_renderer() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("mmdc");
    fs::write(&path, FAKE_RENDERER).expect("Failed to write fake renderer");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("Failed to mark fake renderer executable");
    (dir, path)
}

fn render_id(issued_at_ms: u128) -> RenderId {
    RenderId::with_timestamp(Generation::NONE, issued_at_ms)
}

#[tokio::test]
async fn test_render_produces_artifact() {
    let (_dir, program) = fake_renderer();
    let engine = CommandEngine::new(EngineConfig::new(&program).with_theme("dark"));

    let artifact = engine
        .render(&render_id(42), "graph TD; A-->B")
        .await
        .expect("fake renderer succeeds");

    assert_eq!(
        artifact.as_str(),
        r#"<svg id="vellum-0-42" data-theme="dark">graph TD; A-->B</svg>"#
    );
}

#[tokio::test]
async fn test_render_failure_reports_message() {
    let (_dir, program) = fake_renderer();
    let engine = CommandEngine::new(EngineConfig::new(&program));

    let err = engine
        .render(&render_id(1), "graph TD\n explode")
        .await
        .expect_err("fake renderer fails");

    assert_eq!(err.message(), Some("Parse error on line 2:\n...explode"));
}

#[tokio::test]
async fn test_missing_program() {
    let engine = CommandEngine::new(EngineConfig::new("/nonexistent/vellum/mmdc"));

    let err = engine
        .render(&render_id(1), "graph TD")
        .await
        .expect_err("program does not exist");

    let message = err.message().expect("spawn failures carry a message");
    assert!(message.contains("not found"), "unexpected message: {message}");
}

#[tokio::test]
async fn test_every_template_validates() {
    let engine = CommandEngine::default();

    for template in templates() {
        assert_eq!(
            engine.validate(template.source).await,
            Ok(true),
            "template `{}` should be recognized",
            template.key
        );
    }
}
