use figsync_lib::SyncOutput;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const NODES: &str = r#"[
  {"id":"1:1","name":"Card","type":"FRAME","x":0,"y":0,"width":320,"height":200,
   "fills":[{"type":"SOLID","color":{"r":1,"g":1,"b":1}}],"cornerRadius":8},
  {"id":"1:2","name":"Title","type":"TEXT","x":16,"y":16,"width":200,"height":24,
   "characters":"Hello","fontSize":18,"fontName":{"family":"Inter","style":"Bold"}}
]"#;

/// Runs the binary with HOME pointed at `home` so no user config leaks in.
fn run(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_figsync"))
        .args(args)
        .env("HOME", home)
        .env_remove("RUST_LOG")
        .output()
        .expect("run figsync")
}

fn parse_json(stdout: &[u8]) -> SyncOutput {
    serde_json::from_slice(stdout).expect("output should be valid JSON")
}

#[test]
fn generate_writes_markup_and_exits_zero() {
    let dir = TempDir::new().expect("tempdir");
    let nodes = dir.path().join("nodes.json");
    let html = dir.path().join("out.html");
    std::fs::write(&nodes, NODES).unwrap();

    let output = run(
        dir.path(),
        &[
            "generate",
            "--nodes",
            nodes.to_str().unwrap(),
            "--html-out",
            html.to_str().unwrap(),
        ],
    );

    assert_eq!(output.status.code(), Some(0));
    match parse_json(&output.stdout) {
        SyncOutput::Generate(out) => {
            assert_eq!(out.nodes, 2);
            assert!(out.html.is_none());
            assert!(out.css.as_deref().unwrap_or_default().contains(".figma-1-1"));
        }
        other => panic!("unexpected output: {other:?}"),
    }
    let written = std::fs::read_to_string(&html).unwrap();
    assert!(written.contains("Hello"), "{written}");
}

#[test]
fn generate_missing_snapshot_is_fatal() {
    let dir = TempDir::new().expect("tempdir");
    let missing = dir.path().join("missing.json");

    let output = run(
        dir.path(),
        &["generate", "--nodes", missing.to_str().unwrap()],
    );

    assert_eq!(output.status.code(), Some(2));
    match parse_json(&output.stdout) {
        SyncOutput::Error(out) => {
            assert_eq!(out.error.category, figsync_lib::ErrorCategory::Config);
        }
        other => panic!("unexpected output: {other:?}"),
    }
}

#[test]
fn tokens_exit_zero() {
    let dir = TempDir::new().expect("tempdir");
    let output = run(dir.path(), &["tokens"]);

    assert_eq!(output.status.code(), Some(0));
    match parse_json(&output.stdout) {
        SyncOutput::Tokens(out) => assert_eq!(out.tokens.spacing.len(), 7),
        other => panic!("unexpected output: {other:?}"),
    }
}

#[test]
fn import_local_html_counts_elements() {
    let dir = TempDir::new().expect("tempdir");
    let html = dir.path().join("home.html");
    let css = dir.path().join("home.css");
    std::fs::write(
        &html,
        r#"<div class="hero"></div><h1 class="title">Welcome</h1><p class="lead">Hi</p>"#,
    )
    .unwrap();
    std::fs::write(&css, ".hero { width: 400px; height: 300px; }").unwrap();

    let output = run(
        dir.path(),
        &[
            "import",
            "--html",
            html.to_str().unwrap(),
            "--css",
            css.to_str().unwrap(),
            "--scene",
        ],
    );

    assert_eq!(output.status.code(), Some(0));
    match parse_json(&output.stdout) {
        SyncOutput::Import(out) => {
            assert_eq!(out.total_elements, 3);
            assert_eq!(out.pages[0].page, "home");
            // Hosting frame plus three elements.
            assert_eq!(out.scene.len(), 4);
        }
        other => panic!("unexpected output: {other:?}"),
    }
}

#[test]
fn import_without_classes_exits_one() {
    let dir = TempDir::new().expect("tempdir");
    let html = dir.path().join("plain.html");
    std::fs::write(&html, "<div>no classes here</div>").unwrap();

    let output = run(dir.path(), &["import", "--html", html.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn import_without_source_is_fatal() {
    let dir = TempDir::new().expect("tempdir");
    let output = run(dir.path(), &["import", "--format", "pretty"]);

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn invalid_config_is_fatal() {
    let dir = TempDir::new().expect("tempdir");
    let cfg = dir.path().join("figsync.toml");
    std::fs::write(&cfg, "api_url = \"not a url\"\n").unwrap();

    let output = run(dir.path(), &["tokens", "--config", cfg.to_str().unwrap()]);

    // tokens never reads config, so it still succeeds
    assert_eq!(output.status.code(), Some(0));

    let output = run(
        dir.path(),
        &["health", "--config", cfg.to_str().unwrap()],
    );
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn export_to_unreachable_server_is_fatal() {
    let dir = TempDir::new().expect("tempdir");
    let nodes = dir.path().join("nodes.json");
    std::fs::write(&nodes, NODES).unwrap();

    let output = run(
        dir.path(),
        &[
            "export",
            "--nodes",
            nodes.to_str().unwrap(),
            "--target-file",
            "pages/card.html",
            "--api-url",
            "http://127.0.0.1:9",
        ],
    );

    assert_eq!(output.status.code(), Some(2));
    match parse_json(&output.stdout) {
        SyncOutput::Error(out) => {
            assert_eq!(out.error.category, figsync_lib::ErrorCategory::Network);
        }
        other => panic!("unexpected output: {other:?}"),
    }
}
