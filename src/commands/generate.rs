use std::path::PathBuf;
use std::process::ExitCode;

use figsync_lib::output::{GenerateOutput, SYNC_OUTPUT_VERSION};
use figsync_lib::{generate_css, generate_html, SyncError, SyncOutput};

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};
use crate::pipeline::load_selection;
use crate::settings::load_config;

/// Run the generate command.
pub async fn run_generate(
    config_path: Option<PathBuf>,
    nodes: String,
    html_out: Option<PathBuf>,
    css_out: Option<PathBuf>,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output),
    };

    let selection = match load_selection(&nodes, config.timeouts.request).await {
        Ok(selection) => selection,
        Err(err) => return render_error(err, format, output),
    };
    tracing::debug!(count = selection.len(), "generating markup");

    let html = generate_html(&selection);
    let css = generate_css(&selection);

    // Inline the markup only when it is not being written to files.
    let html = match &html_out {
        Some(path) => {
            tracing::info!(path = %path.display(), "writing html");
            if let Err(err) = std::fs::write(path, html.as_bytes()) {
                return render_error(SyncError::Io(err), format, output);
            }
            None
        }
        None => Some(html),
    };
    let css = match &css_out {
        Some(path) => {
            tracing::info!(path = %path.display(), "writing css");
            if let Err(err) = std::fs::write(path, css.as_bytes()) {
                return render_error(SyncError::Io(err), format, output);
            }
            None
        }
        None => Some(css),
    };

    let body = SyncOutput::Generate(GenerateOutput {
        version: SYNC_OUTPUT_VERSION.to_string(),
        source: nodes,
        nodes: selection.len(),
        html_path: html_out,
        css_path: css_out,
        html,
        css,
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(SyncError::Config(err.to_string()), format, output);
    }
    ExitCode::SUCCESS
}
