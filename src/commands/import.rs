use std::path::{Path, PathBuf};
use std::process::ExitCode;

use figsync_lib::output::{ImportOutput, ImportedPageSummary, SYNC_OUTPUT_VERSION};
use figsync_lib::{
    create_nodes_from_code, FrameSize, ImportOptions, LocalhostClient, MemoryCanvas, SyncError,
    SyncOutput,
};

use crate::cli::OutputFormat;
use crate::formatting::{exit_code_for, render_error, write_output};
use crate::settings::{load_config, resolve_settings, FlagSources};

/// One page of markup waiting to be imported.
#[derive(Debug)]
struct PageMarkup {
    page: String,
    frame: String,
    html: String,
    css: String,
}

/// Run the import command.
#[allow(clippy::too_many_arguments)]
pub async fn run_import(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    page: Option<String>,
    all: bool,
    html: Option<PathBuf>,
    css: Option<PathBuf>,
    api_url: String,
    frame: FrameSize,
    scene: bool,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output),
    };
    let settings = resolve_settings(
        &api_url,
        Some(frame),
        None,
        &config,
        &FlagSources::from_args(raw_args),
    );

    let pages = if let Some(html_path) = html {
        read_local_page(&html_path, css.as_deref())
    } else {
        let client =
            match LocalhostClient::with_timeout(&settings.api_url, settings.request_timeout) {
                Ok(client) => client,
                Err(err) => return render_error(err, format, output),
            };
        match (page, all) {
            (Some(page), _) => fetch_page(&client, page).await,
            (None, true) => fetch_all(&client).await,
            (None, false) => Err(SyncError::Config(
                "Nothing to import: pass --page NAME, --all or --html PATH".to_string(),
            )),
        }
    };
    let pages = match pages {
        Ok(pages) => pages,
        Err(err) => return render_error(err, format, output),
    };

    let mut canvas = MemoryCanvas::new();
    let mut summaries = Vec::with_capacity(pages.len());
    for markup in pages {
        let options = ImportOptions {
            frame_name: markup.frame.clone(),
            frame_size: settings.frame,
        };
        let created =
            create_nodes_from_code(&mut canvas, &markup.html, &markup.css, None, &options).await;
        summaries.push(ImportedPageSummary {
            page: markup.page,
            frame: markup.frame,
            elements: created.len(),
        });
    }
    let total_elements: usize = summaries.iter().map(|s| s.elements).sum();
    if total_elements == 0 {
        tracing::warn!("import completed but no elements were created");
    }

    let body = SyncOutput::Import(ImportOutput {
        version: SYNC_OUTPUT_VERSION.to_string(),
        pages: summaries,
        total_elements,
        scene: if scene { canvas.snapshot() } else { Vec::new() },
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(SyncError::Config(err.to_string()), format, output);
    }
    exit_code_for(total_elements > 0)
}

fn read_local_page(html: &Path, css: Option<&Path>) -> Result<Vec<PageMarkup>, SyncError> {
    let read = |path: &Path| {
        std::fs::read_to_string(path).map_err(|e| {
            SyncError::Config(format!("Local file not found: {} ({e})", path.display()))
        })
    };
    let page = html
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "page".to_string());
    Ok(vec![PageMarkup {
        page,
        frame: ImportOptions::default().frame_name,
        html: read(html)?,
        css: css.map(read).transpose()?.unwrap_or_default(),
    }])
}

async fn fetch_page(client: &LocalhostClient, page: String) -> Result<Vec<PageMarkup>, SyncError> {
    let fetched = client.import_page(&page).await?;
    Ok(vec![PageMarkup {
        page,
        frame: ImportOptions::default().frame_name,
        html: fetched.html,
        css: fetched.css,
    }])
}

async fn fetch_all(client: &LocalhostClient) -> Result<Vec<PageMarkup>, SyncError> {
    let response = client.import_all().await?;
    Ok(response
        .pages
        .into_iter()
        .map(|(name, source)| PageMarkup {
            frame: page_frame_name(&name),
            page: name,
            html: source.html,
            css: source.css,
        })
        .collect())
}

/// `"about"` becomes `"About Page"`.
fn page_frame_name(page: &str) -> String {
    let mut chars = page.chars();
    match chars.next() {
        Some(first) => format!("{}{} Page", first.to_uppercase(), chars.as_str()),
        None => "Page".to_string(),
    }
}
