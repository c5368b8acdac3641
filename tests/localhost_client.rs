//! Sync-server client and plugin host against a mock server.

use figsync_lib::host::{Notification, NotifyKind, Tab};
use figsync_lib::localhost_client::SyncConfigPatch;
use figsync_lib::{
    generate_design_data, DesignNode, ExportRequest, HostMessage, LocalhostClient, MemoryCanvas,
    NodeKind, PluginHost, PluginMessage, SceneNode, SyncConfig, SyncError,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn card() -> DesignNode {
    let mut node = DesignNode::new("1:1", "Card", NodeKind::Frame);
    node.width = 100.0;
    node.height = 50.0;
    node
}

#[tokio::test]
async fn export_posts_design_data_to_export_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/figma/export"))
        .and(body_partial_json(json!({
            "targetFile": "pages/card.html",
            "targetCss": "styles/card.css",
            "overwrite": false,
            "designData": {"nodes": [{"id": "1:1", "name": "Card"}]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Files exported successfully",
            "files": {"html": "pages/card.html", "css": "styles/card.css"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = LocalhostClient::new(server.uri()).unwrap();
    let request = ExportRequest::new(
        "pages/card.html",
        Some("styles/card.css".into()),
        false,
        generate_design_data(vec![card()]),
    );
    let response = client.export_design(&request).await.unwrap();

    assert!(response.success);
    let files = response.files.expect("files");
    assert_eq!(files.css.as_deref(), Some("styles/card.css"));
}

#[tokio::test]
async fn import_page_sends_page_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/figma/import"))
        .and(query_param("page", "about"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "html": "<div class=\"box\"></div>",
            "css": ".box { width: 10px; }",
            "designTokens": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = LocalhostClient::new(server.uri()).unwrap();
    let page = client.import_page("about").await.unwrap();

    assert_eq!(page.html, "<div class=\"box\"></div>");
    assert_eq!(page.page.as_deref(), Some("about"));
}

#[tokio::test]
async fn base_url_path_prefix_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sync/api/figma/import"))
        .and(query_param("page", "home"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "html": "<main></main>",
            "css": ""
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sync/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;

    let client = LocalhostClient::with_timeout(format!("{}/sync", server.uri()), None).unwrap();
    let page = client.import_page("home").await.unwrap();
    assert_eq!(page.html, "<main></main>");
    assert!(client.health().await.is_ok());
}

#[tokio::test]
async fn import_page_without_html_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/figma/import"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"css": ""})))
        .mount(&server)
        .await;

    let client = LocalhostClient::new(server.uri()).unwrap();
    let err = client.import_page("index").await.unwrap_err();

    assert!(matches!(err, SyncError::MalformedResponse(_)), "{err}");
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let client = LocalhostClient::new(server.uri()).unwrap();
    let err = client.health().await.unwrap_err();

    assert!(matches!(err, SyncError::MalformedResponse(_)), "{err}");
}

#[tokio::test]
async fn missing_page_surfaces_status_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/figma/import"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = LocalhostClient::new(server.uri()).unwrap();
    match client.import_page("nope").await {
        Err(SyncError::Http { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Not Found");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn import_all_lists_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/figma/import-all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pages": {
                "index": {"html": "<p class=\"a\">Hi</p>", "css": "", "file": "index.html"},
                "about": {"html": "<div class=\"b\"></div>", "css": ".b {}", "file": "about.html"}
            },
            "designTokens": {},
            "totalPages": 2,
            "timestamp": "2024-01-01T00:00:00.000Z"
        })))
        .mount(&server)
        .await;

    let client = LocalhostClient::new(server.uri()).unwrap();
    let all = client.import_all().await.unwrap();

    assert_eq!(all.total_pages, 2);
    assert_eq!(all.pages.keys().collect::<Vec<_>>(), ["about", "index"]);
}

#[tokio::test]
async fn save_config_wraps_config_with_timestamp() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/figma/sync-config"))
        .and(body_partial_json(json!({
            "config": {"autoSync": false, "syncColors": true}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = LocalhostClient::new(server.uri()).unwrap();
    let mut config = SyncConfig::default();
    config.auto_sync = false;
    client.save_config(&config).await.unwrap();
}

fn host_for(
    server: &MockServer,
    canvas: MemoryCanvas,
) -> PluginHost<MemoryCanvas, Vec<HostMessage>> {
    let config = SyncConfig {
        api_url: server.uri(),
        ..SyncConfig::default()
    };
    PluginHost::new(canvas, Vec::new(), config)
}

fn notification(message: &HostMessage) -> &Notification {
    match message {
        HostMessage::Notify(n) => n,
        other => panic!("expected notification, got {other:?}"),
    }
}

#[tokio::test]
async fn host_exports_selection_and_reports_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/figma/export"))
        .and(body_partial_json(json!({"targetFile": "index.html"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let scene: Vec<SceneNode> = serde_json::from_value(json!([
        {"id": "2:1", "name": "Hero", "type": "FRAME", "width": 300, "height": 200}
    ]))
    .unwrap();
    let mut host = host_for(&server, MemoryCanvas::with_selection(scene));
    let message: PluginMessage = serde_json::from_value(json!({
        "type": "export-to-localhost",
        "payload": {"targetFile": "index.html"}
    }))
    .unwrap();
    host.handle(message).await;

    let sent = notification(&host.notifier()[0]);
    assert_eq!(sent.tab, Tab::Export);
    assert_eq!(sent.kind, NotifyKind::Success);
    assert_eq!(sent.message, "Successfully exported to index.html");
}

#[tokio::test]
async fn host_imports_page_into_canvas() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/figma/import"))
        .and(query_param("page", "index"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "html": "<div class=\"box\"></div><h1 class=\"title\">Hello</h1>",
            "css": ".box { width: 120px; height: 80px; }"
        })))
        .mount(&server)
        .await;

    let mut host = host_for(&server, MemoryCanvas::new());
    host.handle(PluginMessage::ImportFromLocalhost(
        figsync_lib::host::ImportPayload {
            page: "index".into(),
            localhost_url: None,
        },
    ))
    .await;

    let sent = notification(&host.notifier()[0]);
    assert_eq!(sent.kind, NotifyKind::Success);
    assert_eq!(sent.message, "Successfully imported 2 elements from index");
    // Hosting frame plus both elements.
    assert_eq!(host.canvas().len(), 3);
}

#[tokio::test]
async fn host_reports_import_fetch_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/figma/import"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut host = host_for(&server, MemoryCanvas::new());
    host.handle(PluginMessage::ImportFromLocalhost(
        figsync_lib::host::ImportPayload {
            page: "index".into(),
            localhost_url: None,
        },
    ))
    .await;

    let sent = notification(&host.notifier()[0]);
    assert_eq!(sent.kind, NotifyKind::Error);
    assert_eq!(
        sent.message,
        "Failed to fetch from localhost: Internal Server Error"
    );
    assert!(host.canvas().is_empty());
}

#[tokio::test]
async fn host_save_config_merges_and_posts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/figma/sync-config"))
        .and(body_partial_json(json!({"config": {"watchMode": true}})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut host = host_for(&server, MemoryCanvas::new());
    host.handle(PluginMessage::SaveConfig(SyncConfigPatch {
        watch_mode: Some(true),
        ..SyncConfigPatch::default()
    }))
    .await;

    assert!(host.config().watch_mode);
    let sent = notification(&host.notifier()[0]);
    assert_eq!(sent.tab, Tab::Settings);
    assert_eq!(sent.message, "Configuration saved successfully");
}
