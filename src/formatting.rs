use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use figsync_lib::output::SYNC_OUTPUT_VERSION;
use figsync_lib::{ErrorOutput, SyncError, SyncOutput};

use crate::cli::OutputFormat;

/// Write output in the requested format.
pub fn write_output(
    body: &SyncOutput,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => write_json_output(body, output.as_deref())?,
        OutputFormat::Pretty => write_pretty_output(body, output.as_deref())?,
    };
    Ok(())
}

/// Render an error and return the appropriate exit code.
pub fn render_error(err: SyncError, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    tracing::debug!(error = %err, "command failed");
    let error_payload = err.to_payload();
    let payload = SyncOutput::Error(ErrorOutput {
        version: SYNC_OUTPUT_VERSION.to_string(),
        message: Some(error_payload.message.clone()),
        error: error_payload,
    });

    match format {
        OutputFormat::Json => {
            let content =
                serde_json::to_string(&payload).unwrap_or_else(|_| "{\"mode\":\"error\"}".into());
            if let Some(path) = output {
                if let Err(write_err) = std::fs::write(&path, &content) {
                    eprintln!("Failed to write error output: {}", write_err);
                    println!("{content}");
                }
            } else {
                println!("{content}");
            }
        }
        OutputFormat::Pretty => {
            if let Err(write_err) = write_pretty_output(&payload, output.as_deref()) {
                eprintln!("Failed to write error output: {}", write_err);
            }
        }
    };

    // 2 is fatal; a completed run with a negative outcome uses 1.
    ExitCode::from(2)
}

/// Write JSON output to file or stdout.
fn write_json_output(body: &SyncOutput, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let content = serde_json::to_string(body)?;
    if let Some(path) = output {
        std::fs::write(path, content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Write pretty output to file or stdout.
fn write_pretty_output(body: &SyncOutput, output: Option<&Path>) -> io::Result<()> {
    let stdout_is_tty = std::io::stdout().is_terminal();
    let use_human = output.is_none() && stdout_is_tty;

    if use_human {
        let content = format_pretty(body, true);
        println!("{content}");
        return Ok(());
    }

    // Non-tty or file output: keep JSON shape for pipelines/files.
    let content =
        serde_json::to_string_pretty(body).unwrap_or_else(|_| "{\"mode\":\"error\"}".to_string());
    if let Some(path) = output {
        std::fs::write(path, &content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Format output for human consumption in a terminal.
pub fn format_pretty(body: &SyncOutput, colorize: bool) -> String {
    let status = |ok: bool, yes: &str, no: &str| {
        if ok {
            color(yes, "32", colorize)
        } else {
            color(no, "31", colorize)
        }
    };

    let mut buf = String::new();
    match body {
        SyncOutput::Generate(out) => {
            let header = color("[GENERATE]", "36", colorize);
            writeln!(buf, "{header} {} node(s) from {}", out.nodes, out.source).ok();
            if let Some(path) = &out.html_path {
                writeln!(buf, "- {:6} {}", "html", path.display()).ok();
            }
            if let Some(path) = &out.css_path {
                writeln!(buf, "- {:6} {}", "css", path.display()).ok();
            }
            if let Some(html) = &out.html {
                writeln!(buf, "{html}").ok();
            }
            if let Some(css) = &out.css {
                writeln!(buf, "{css}").ok();
            }
        }
        SyncOutput::Export(out) => {
            let header = color("[EXPORT]", "36", colorize);
            writeln!(
                buf,
                "{header} {} {} node(s) -> {}",
                status(out.success, "OK", "FAILED"),
                out.nodes,
                out.target_file
            )
            .ok();
            if let Some(message) = &out.message {
                writeln!(buf, "Server: {message}").ok();
            }
            if let Some(files) = &out.files {
                writeln!(buf, "Files:").ok();
                if let Some(html) = &files.html {
                    writeln!(buf, "- {:6} {}", "html", html).ok();
                }
                if let Some(css) = &files.css {
                    writeln!(buf, "- {:6} {}", "css", css).ok();
                }
            }
        }
        SyncOutput::Import(out) => {
            let header = color("[IMPORT]", "36", colorize);
            writeln!(buf, "{header} {} element(s)", out.total_elements).ok();
            for page in &out.pages {
                writeln!(buf, "- {:16} {} ({})", page.page, page.elements, page.frame).ok();
            }
        }
        SyncOutput::Tokens(out) => {
            let header = color("[TOKENS]", "34", colorize);
            writeln!(buf, "{header} Design tokens").ok();
            for (name, value) in &out.tokens.colors {
                writeln!(buf, "- color   {:12} {}", name, value).ok();
            }
            for (name, value) in &out.tokens.spacing {
                writeln!(buf, "- spacing {:12} {}", name, value).ok();
            }
            for (name, value) in &out.tokens.border_radius {
                writeln!(buf, "- radius  {:12} {}", name, value).ok();
            }
        }
        SyncOutput::Health(out) => {
            let header = color("[HEALTH]", "34", colorize);
            writeln!(
                buf,
                "{header} {} {}",
                status(out.healthy, "UP", "DOWN"),
                out.api_url
            )
            .ok();
            if let Some(s) = &out.status {
                writeln!(buf, "Status: {s}").ok();
            }
        }
        SyncOutput::SaveConfig(out) => {
            let header = color("[CONFIG]", "34", colorize);
            writeln!(buf, "{header} Saved to {}", out.api_url).ok();
            let cfg = &out.config;
            writeln!(buf, "- {:16} {}", "localhostUrl", cfg.localhost_url).ok();
            writeln!(buf, "- {:16} {}", "autoSync", cfg.auto_sync).ok();
            writeln!(buf, "- {:16} {}", "watchMode", cfg.watch_mode).ok();
            writeln!(buf, "- {:16} {}", "syncColors", cfg.sync_colors).ok();
            writeln!(buf, "- {:16} {}", "syncTypography", cfg.sync_typography).ok();
        }
        SyncOutput::Watch(out) => {
            let header = color("[WATCH]", "36", colorize);
            writeln!(
                buf,
                "{header} {} cycle(s), {} failure(s) -> {}",
                out.cycles, out.failures, out.target_file
            )
            .ok();
            if let Some(last) = &out.last_sync {
                writeln!(buf, "Last sync: {last}").ok();
            }
        }
        SyncOutput::Error(out) => {
            let header = color("[ERROR]", "31", colorize);
            let message = out
                .message
                .as_deref()
                .unwrap_or_else(|| out.error.message.as_str());
            writeln!(buf, "{} {}", header, message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
        }
    }
    buf
}

/// Apply ANSI color codes when enabled.
fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Exit code for a command that ran to completion.
pub fn exit_code_for(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
