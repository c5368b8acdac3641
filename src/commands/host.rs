use std::path::PathBuf;
use std::process::ExitCode;

use figsync_lib::host::JsonLines;
use figsync_lib::{
    FrameSize, ImportOptions, MemoryCanvas, PluginHost, PluginMessage, SyncConfig, SyncError,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::OutputFormat;
use crate::formatting::render_error;
use crate::pipeline::read_scene;
use crate::settings::{load_config, resolve_settings, FlagSources};

/// Run the plugin host: one JSON message per stdin line, notifications on stdout.
pub async fn run_host(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    document: Option<PathBuf>,
    api_url: String,
    frame: FrameSize,
) -> ExitCode {
    // Protocol output is JSON lines, so fatal errors use the JSON shape too.
    let format = OutputFormat::Json;
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, None),
    };
    let settings = resolve_settings(
        &api_url,
        Some(frame),
        None,
        &config,
        &FlagSources::from_args(raw_args),
    );

    let canvas = match document.as_deref().map(read_scene).transpose() {
        Ok(Some(scene)) => MemoryCanvas::with_selection(scene),
        Ok(None) => MemoryCanvas::new(),
        Err(err) => return render_error(err, format, None),
    };
    let mut sync_config = SyncConfig::from(&config);
    sync_config.api_url = settings.api_url.clone();

    let mut host = PluginHost::new(canvas, JsonLines(std::io::stdout()), sync_config)
        .with_import_options(ImportOptions {
            frame_size: settings.frame,
            ..ImportOptions::default()
        })
        .with_request_timeout(settings.request_timeout);
    tracing::info!(api_url = %settings.api_url, "plugin host ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => return render_error(SyncError::Io(err), format, None),
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<PluginMessage>(&line) {
            Ok(message) => host.handle(message).await,
            Err(err) => tracing::warn!(error = %err, "ignoring unreadable plugin message"),
        }
        if host.is_closed() {
            break;
        }
    }
    ExitCode::SUCCESS
}
