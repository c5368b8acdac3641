use std::path::PathBuf;
use std::process::ExitCode;

use figsync_lib::output::{ExportOutput, SYNC_OUTPUT_VERSION};
use figsync_lib::{
    generate_design_data, ExportRequest, LocalhostClient, SyncError, SyncOutput,
};

use crate::cli::OutputFormat;
use crate::formatting::{exit_code_for, render_error, write_output};
use crate::pipeline::load_selection;
use crate::settings::{format_effective_config, load_config, resolve_settings, FlagSources};

/// Run the export command.
#[allow(clippy::too_many_arguments)]
pub async fn run_export(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    verbose: bool,
    nodes: String,
    target_file: String,
    target_css: Option<String>,
    overwrite: bool,
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
    if verbose {
        tracing::debug!("{}", format_effective_config(&settings, config_path.as_deref()));
    }

    let selection = match load_selection(&nodes, settings.request_timeout).await {
        Ok(selection) if selection.is_empty() => {
            return render_error(SyncError::EmptySelection, format, output)
        }
        Ok(selection) => selection,
        Err(err) => return render_error(err, format, output),
    };
    let count = selection.len();

    let client = match LocalhostClient::with_timeout(&settings.api_url, settings.request_timeout) {
        Ok(client) => client,
        Err(err) => return render_error(err, format, output),
    };
    let request = ExportRequest::new(
        target_file.clone(),
        target_css,
        overwrite,
        generate_design_data(selection),
    );
    let response = match client.export_design(&request).await {
        Ok(response) => response,
        Err(err) => return render_error(err, format, output),
    };
    if !response.success {
        tracing::warn!(message = ?response.message, "server rejected export");
    }

    let body = SyncOutput::Export(ExportOutput {
        version: SYNC_OUTPUT_VERSION.to_string(),
        source: nodes,
        target_file,
        nodes: count,
        success: response.success,
        message: response.message,
        files: response.files,
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(SyncError::Config(err.to_string()), format, output);
    }
    exit_code_for(response.success)
}
