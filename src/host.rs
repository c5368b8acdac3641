//! Plugin host: dispatches UI messages against a [`Canvas`] and the sync server.
//!
//! Every outcome, success or failure, is reported through the [`Notifier`];
//! nothing is returned to the caller and no error ends the host.

use std::io::Write;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

use crate::error::SyncError;
use crate::export::{extract_selection, generate_design_data};
use crate::import::{create_nodes_from_code, Canvas, ImportOptions};
use crate::localhost_client::{
    ExportRequest, ExportResponse, LocalhostClient, SyncConfig, SyncConfigPatch,
};

/// Messages sent from the plugin UI to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum PluginMessage {
    ExportToLocalhost(ExportPayload),
    ImportFromLocalhost(ImportPayload),
    SaveConfig(SyncConfigPatch),
    GetConfig,
    #[serde(rename = "CLOSE")]
    Close,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
    pub target_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_css: Option<String>,
    #[serde(default)]
    pub overwrite: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPayload {
    pub page: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localhost_url: Option<String>,
}

/// Messages sent from the host back to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum HostMessage {
    Notify(Notification),
    Config(SyncConfig),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub tab: Tab,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotifyKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Export,
    Import,
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyKind {
    Error,
    Success,
    Info,
}

/// Sink for host-to-UI messages.
pub trait Notifier {
    fn post(&mut self, message: HostMessage);
}

impl Notifier for Vec<HostMessage> {
    fn post(&mut self, message: HostMessage) {
        self.push(message);
    }
}

impl Notifier for UnboundedSender<HostMessage> {
    fn post(&mut self, message: HostMessage) {
        if self.send(message).is_err() {
            tracing::warn!("ui channel closed; dropping host message");
        }
    }
}

/// Writes one JSON document per line.
pub struct JsonLines<W: Write>(pub W);

impl<W: Write> Notifier for JsonLines<W> {
    fn post(&mut self, message: HostMessage) {
        let written = serde_json::to_string(&message)
            .map_err(std::io::Error::from)
            .and_then(|line| writeln!(self.0, "{line}"))
            .and_then(|_| self.0.flush());
        if let Err(err) = written {
            tracing::warn!(error = %err, "failed to write host message");
        }
    }
}

pub struct PluginHost<C: Canvas, N: Notifier> {
    canvas: C,
    notifier: N,
    config: SyncConfig,
    import_options: ImportOptions,
    request_timeout: Option<Duration>,
    closed: bool,
}

impl<C: Canvas, N: Notifier> PluginHost<C, N> {
    pub fn new(canvas: C, notifier: N, config: SyncConfig) -> Self {
        Self {
            canvas,
            notifier,
            config,
            import_options: ImportOptions::default(),
            request_timeout: None,
            closed: false,
        }
    }

    pub fn with_import_options(mut self, options: ImportOptions) -> Self {
        self.import_options = options;
        self
    }

    /// Bound sync-server requests; unbounded when `None`.
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// True once a `CLOSE` message has been handled.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub async fn handle(&mut self, message: PluginMessage) {
        if self.closed {
            tracing::debug!(?message, "host closed; ignoring message");
            return;
        }
        match message {
            PluginMessage::ExportToLocalhost(payload) => self.export_to_localhost(payload).await,
            PluginMessage::ImportFromLocalhost(payload) => {
                self.import_from_localhost(payload).await
            }
            PluginMessage::SaveConfig(patch) => self.save_config(patch).await,
            PluginMessage::GetConfig => {
                let config = self.config.clone();
                self.notifier.post(HostMessage::Config(config));
            }
            PluginMessage::Close => {
                tracing::info!("plugin closed");
                self.closed = true;
            }
        }
    }

    fn notify(&mut self, tab: Tab, message: impl Into<String>, kind: NotifyKind) {
        let message = message.into();
        match kind {
            NotifyKind::Error => tracing::warn!(?tab, %message, "notify"),
            _ => tracing::info!(?tab, %message, "notify"),
        }
        self.notifier.post(HostMessage::Notify(Notification {
            tab,
            message,
            kind,
        }));
    }

    fn client(&self) -> Result<LocalhostClient, SyncError> {
        LocalhostClient::with_timeout(&self.config.api_url, self.request_timeout)
    }

    async fn export_to_localhost(&mut self, payload: ExportPayload) {
        let selection = self.canvas.selection();
        if selection.is_empty() {
            self.notify(
                Tab::Export,
                "Please select at least one frame or component to export",
                NotifyKind::Error,
            );
            return;
        }

        match self.send_selection(&selection, &payload).await {
            Ok(response) if response.success => self.notify(
                Tab::Export,
                format!("Successfully exported to {}", payload.target_file),
                NotifyKind::Success,
            ),
            Ok(response) => self.notify(
                Tab::Export,
                format!(
                    "Export failed: {}",
                    response.message.unwrap_or_else(|| "unknown reason".into())
                ),
                NotifyKind::Error,
            ),
            Err(err) => self.notify(
                Tab::Export,
                format!("Export error: {err}"),
                NotifyKind::Error,
            ),
        }
    }

    async fn send_selection(
        &self,
        selection: &[C::Handle],
        payload: &ExportPayload,
    ) -> Result<ExportResponse, SyncError> {
        let nodes: Vec<&C::Node> = selection
            .iter()
            .filter_map(|handle| self.canvas.node(*handle).ok())
            .collect();
        let design_data = generate_design_data(extract_selection(nodes));
        let request = ExportRequest::new(
            payload.target_file.clone(),
            payload.target_css.clone(),
            payload.overwrite,
            design_data,
        );
        self.client()?.export_design(&request).await
    }

    async fn import_from_localhost(&mut self, payload: ImportPayload) {
        let fetched = match self.client() {
            Ok(client) => client.import_page(&payload.page).await,
            Err(err) => Err(err),
        };
        let page = match fetched {
            Ok(page) => page,
            Err(SyncError::Http { message, .. }) => {
                self.notify(
                    Tab::Import,
                    format!("Failed to fetch from localhost: {message}"),
                    NotifyKind::Error,
                );
                return;
            }
            Err(err) => {
                self.notify(Tab::Import, format!("Import error: {err}"), NotifyKind::Error);
                return;
            }
        };

        let created = create_nodes_from_code(
            &mut self.canvas,
            &page.html,
            &page.css,
            None,
            &self.import_options,
        )
        .await;

        if created.is_empty() {
            self.notify(
                Tab::Import,
                "Import completed but no elements were created",
                NotifyKind::Info,
            );
        } else {
            self.notify(
                Tab::Import,
                format!(
                    "Successfully imported {} elements from {}",
                    created.len(),
                    payload.page
                ),
                NotifyKind::Success,
            );
        }
    }

    async fn save_config(&mut self, patch: SyncConfigPatch) {
        self.config.merge(patch);
        let saved = match self.client() {
            Ok(client) => client.save_config(&self.config).await,
            Err(err) => Err(err),
        };
        match saved {
            Ok(()) => self.notify(
                Tab::Settings,
                "Configuration saved successfully",
                NotifyKind::Success,
            ),
            Err(err) => self.notify(
                Tab::Settings,
                format!("Config save error: {err}"),
                NotifyKind::Error,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::MemoryCanvas;

    fn host(canvas: MemoryCanvas) -> PluginHost<MemoryCanvas, Vec<HostMessage>> {
        let config = SyncConfig {
            // nothing listens here; any request would fail fast
            api_url: "http://127.0.0.1:9".into(),
            ..SyncConfig::default()
        };
        PluginHost::new(canvas, Vec::new(), config)
            .with_request_timeout(Some(Duration::from_secs(2)))
    }

    #[test]
    fn plugin_messages_use_type_and_payload() {
        let msg: PluginMessage = serde_json::from_str(
            r#"{"type":"export-to-localhost","payload":{"targetFile":"a.html","overwrite":true}}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            PluginMessage::ExportToLocalhost(ExportPayload {
                target_file: "a.html".into(),
                target_css: None,
                overwrite: true,
            })
        );

        let close: PluginMessage = serde_json::from_str(r#"{"type":"CLOSE"}"#).unwrap();
        assert_eq!(close, PluginMessage::Close);
        let get: PluginMessage = serde_json::from_str(r#"{"type":"get-config"}"#).unwrap();
        assert_eq!(get, PluginMessage::GetConfig);
    }

    #[test]
    fn notifications_serialize_like_the_ui_expects() {
        let msg = HostMessage::Notify(Notification {
            tab: Tab::Import,
            message: "done".into(),
            kind: NotifyKind::Info,
        });
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type":"notify","payload":{"tab":"import","message":"done","type":"info"}})
        );
    }

    #[tokio::test]
    async fn export_with_empty_selection_reports_error() {
        let mut host = host(MemoryCanvas::new());
        host.handle(PluginMessage::ExportToLocalhost(ExportPayload {
            target_file: "x.html".into(),
            target_css: None,
            overwrite: false,
        }))
        .await;

        assert_eq!(
            host.notifier(),
            &vec![HostMessage::Notify(Notification {
                tab: Tab::Export,
                message: "Please select at least one frame or component to export".into(),
                kind: NotifyKind::Error,
            })]
        );
    }

    #[tokio::test]
    async fn get_config_replies_with_current_config() {
        let mut host = host(MemoryCanvas::new());
        host.handle(PluginMessage::GetConfig).await;

        match &host.notifier()[..] {
            [HostMessage::Config(config)] => assert_eq!(config.api_url, "http://127.0.0.1:9"),
            other => panic!("unexpected messages: {other:?}"),
        }
    }

    #[tokio::test]
    async fn save_config_merges_even_when_server_is_down() {
        let mut host = host(MemoryCanvas::new());
        host.handle(PluginMessage::SaveConfig(SyncConfigPatch {
            auto_sync: Some(true),
            ..SyncConfigPatch::default()
        }))
        .await;

        assert!(host.config().auto_sync);
        match &host.notifier()[..] {
            [HostMessage::Notify(n)] => {
                assert_eq!(n.tab, Tab::Settings);
                assert_eq!(n.kind, NotifyKind::Error);
                assert!(n.message.starts_with("Config save error"));
            }
            other => panic!("unexpected messages: {other:?}"),
        }
    }

    #[tokio::test]
    async fn close_stops_handling() {
        let mut host = host(MemoryCanvas::new());
        host.handle(PluginMessage::Close).await;
        host.handle(PluginMessage::GetConfig).await;

        assert!(host.is_closed());
        assert!(host.notifier().is_empty());
    }

    #[test]
    fn json_lines_writes_one_message_per_line() {
        let mut sink = JsonLines(Vec::new());
        sink.post(HostMessage::Config(SyncConfig::default()));
        sink.post(HostMessage::Config(SyncConfig::default()));

        let text = String::from_utf8(sink.0).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with(r#"{"type":"config""#));
    }
}
