use std::path::PathBuf;
use std::process::ExitCode;

use figsync_lib::localhost_client::SyncConfigPatch;
use figsync_lib::output::{ConfigOutput, HealthOutput, TokensOutput, SYNC_OUTPUT_VERSION};
use figsync_lib::{design_tokens, LocalhostClient, SyncConfig, SyncError, SyncOutput};

use crate::cli::OutputFormat;
use crate::formatting::{exit_code_for, render_error, write_output};
use crate::settings::{load_config, resolve_settings, FlagSources};

/// Run the tokens command.
pub fn run_tokens(format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    let body = SyncOutput::Tokens(TokensOutput {
        version: SYNC_OUTPUT_VERSION.to_string(),
        tokens: design_tokens(),
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(SyncError::Config(err.to_string()), format, output);
    }
    ExitCode::SUCCESS
}

/// Run the health command. An unreachable server is a reported outcome (exit 1).
pub async fn run_health(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    api_url: String,
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
        None,
        &config,
        &FlagSources::from_args(raw_args),
    );
    let client = match LocalhostClient::with_timeout(&settings.api_url, settings.request_timeout) {
        Ok(client) => client,
        Err(err) => return render_error(err, format, output),
    };

    let (healthy, status) = match client.health().await {
        Ok(response) => (true, response.status),
        Err(err) => {
            tracing::warn!(error = %err, "sync server health check failed");
            (false, Some(err.to_string()))
        }
    };

    let body = SyncOutput::Health(HealthOutput {
        version: SYNC_OUTPUT_VERSION.to_string(),
        api_url: settings.api_url,
        healthy,
        status,
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(SyncError::Config(err.to_string()), format, output);
    }
    exit_code_for(healthy)
}

/// Run the save-config command.
pub async fn run_save_config(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    api_url: String,
    patch: SyncConfigPatch,
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
        None,
        &config,
        &FlagSources::from_args(raw_args),
    );

    let mut sync_config = SyncConfig::from(&config);
    sync_config.api_url = settings.api_url.clone();
    sync_config.merge(patch);

    let client = match LocalhostClient::with_timeout(&settings.api_url, settings.request_timeout) {
        Ok(client) => client,
        Err(err) => return render_error(err, format, output),
    };
    if let Err(err) = client.save_config(&sync_config).await {
        return render_error(err, format, output);
    }

    let body = SyncOutput::SaveConfig(ConfigOutput {
        version: SYNC_OUTPUT_VERSION.to_string(),
        api_url: settings.api_url,
        config: sync_config,
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(SyncError::Config(err.to_string()), format, output);
    }
    ExitCode::SUCCESS
}
