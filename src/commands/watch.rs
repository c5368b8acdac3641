use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use figsync_lib::localhost_client::timestamp_now;
use figsync_lib::output::{WatchOutput, SYNC_OUTPUT_VERSION};
use figsync_lib::{
    generate_design_data, ExportRequest, LocalhostClient, SyncConfig, SyncError, SyncOutput,
};
use tokio::time::MissedTickBehavior;

use crate::cli::OutputFormat;
use crate::formatting::{exit_code_for, render_error, write_output};
use crate::pipeline::load_selection;
use crate::settings::{format_effective_config, load_config, resolve_settings, FlagSources};

/// What one sync cycle sends.
struct SyncTarget {
    nodes: String,
    target_file: String,
    target_css: Option<String>,
    timeout: Option<Duration>,
}

/// Run the watch command until Ctrl-C.
#[allow(clippy::too_many_arguments)]
pub async fn run_watch(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    verbose: bool,
    nodes: String,
    target_file: String,
    target_css: Option<String>,
    api_url: String,
    interval: Duration,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output),
    };
    let settings = resolve_settings(
        &api_url,
        None,
        Some(interval),
        &config,
        &FlagSources::from_args(raw_args),
    );
    if verbose {
        tracing::debug!("{}", format_effective_config(&settings, config_path.as_deref()));
    }

    let client = match LocalhostClient::with_timeout(&settings.api_url, settings.request_timeout) {
        Ok(client) => client,
        Err(err) => return render_error(err, format, output),
    };
    let target = SyncTarget {
        nodes,
        target_file,
        target_css,
        timeout: settings.request_timeout,
    };
    let mut sync_config = SyncConfig::from(&config);
    sync_config.api_url = settings.api_url.clone();
    sync_config.watch_mode = true;

    tracing::info!(
        interval = ?settings.interval,
        target = %target.target_file,
        "watching; press Ctrl-C to stop"
    );

    let mut ticker = tokio::time::interval(settings.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut cycles = 0u64;
    let mut failures = 0u64;
    let mut last_ok = true;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("stopping watch");
                break;
            }
            _ = ticker.tick() => {
                cycles += 1;
                match sync_once(&client, &target, &mut sync_config).await {
                    Ok(()) => {
                        last_ok = true;
                        tracing::info!(cycle = cycles, "sync complete");
                    }
                    Err(err) => {
                        last_ok = false;
                        failures += 1;
                        tracing::warn!(cycle = cycles, error = %err, "sync failed");
                    }
                }
            }
        }
    }

    let body = SyncOutput::Watch(WatchOutput {
        version: SYNC_OUTPUT_VERSION.to_string(),
        target_file: target.target_file,
        cycles,
        failures,
        last_sync: sync_config.last_sync,
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(SyncError::Config(err.to_string()), format, output);
    }
    exit_code_for(last_ok)
}

/// Health check, export, then record `lastSync` on the server.
async fn sync_once(
    client: &LocalhostClient,
    target: &SyncTarget,
    sync_config: &mut SyncConfig,
) -> Result<(), SyncError> {
    client.health().await?;

    let selection = load_selection(&target.nodes, target.timeout).await?;
    if selection.is_empty() {
        return Err(SyncError::EmptySelection);
    }
    let request = ExportRequest::new(
        target.target_file.clone(),
        target.target_css.clone(),
        true,
        generate_design_data(selection),
    );
    let response = client.export_design(&request).await?;
    if !response.success {
        return Err(SyncError::ExportRejected(
            response.message.unwrap_or_else(|| "unknown reason".into()),
        ));
    }

    sync_config.last_sync = Some(timestamp_now());
    client.save_config(sync_config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn snapshot() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .unwrap();
        write!(file, r#"[{{"id":"1:1","name":"Card","type":"FRAME","width":10,"height":10}}]"#)
            .unwrap();
        file
    }

    fn target(file: &tempfile::NamedTempFile) -> SyncTarget {
        SyncTarget {
            nodes: file.path().display().to_string(),
            target_file: "pages/card.html".into(),
            target_css: None,
            timeout: Some(Duration::from_secs(5)),
        }
    }

    #[tokio::test]
    async fn sync_once_exports_and_records_last_sync() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "ok"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/figma/export"))
            .and(body_partial_json(serde_json::json!({
                "targetFile": "pages/card.html",
                "overwrite": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/figma/sync-config"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let file = snapshot();
        let client = LocalhostClient::new(server.uri()).unwrap();
        let mut config = SyncConfig::default();
        sync_once(&client, &target(&file), &mut config).await.unwrap();

        assert!(config.last_sync.is_some());
    }

    #[tokio::test]
    async fn sync_once_stops_when_server_is_unhealthy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let file = snapshot();
        let client = LocalhostClient::new(server.uri()).unwrap();
        let mut config = SyncConfig::default();
        let err = sync_once(&client, &target(&file), &mut config)
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::Http { status: 503, .. }), "{err}");
        assert!(config.last_sync.is_none());
    }

    #[tokio::test]
    async fn sync_once_reports_rejected_export() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "ok"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/figma/export"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"success": false, "message": "File exists"}),
            ))
            .mount(&server)
            .await;

        let file = snapshot();
        let client = LocalhostClient::new(server.uri()).unwrap();
        let mut config = SyncConfig::default();
        let err = sync_once(&client, &target(&file), &mut config)
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::ExportRejected(ref m) if m == "File exists"));
    }
}
