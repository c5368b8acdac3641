mod cli;
mod commands;
mod formatting;
mod pipeline;
mod settings;

use std::process::ExitCode;

use cli::Commands;
use commands::{
    run_export, run_generate, run_health, run_host, run_import, run_save_config, run_tokens,
    run_watch,
};
use figsync_lib::localhost_client::SyncConfigPatch;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}

/// Logs go to stderr; stdout carries command output only.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = if verbose {
        EnvFilter::new(default)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn run() -> ExitCode {
    let raw_args: Vec<String> = std::env::args().collect();
    let args = cli::parse();
    init_tracing(args.verbose);

    match args.command {
        Commands::Generate {
            nodes,
            html_out,
            css_out,
            format,
            output,
        } => run_generate(args.config, nodes, html_out, css_out, format, output).await,
        Commands::Export {
            nodes,
            target_file,
            target_css,
            overwrite,
            api_url,
            format,
            output,
        } => {
            run_export(
                &raw_args,
                args.config,
                args.verbose,
                nodes,
                target_file,
                target_css,
                overwrite,
                api_url,
                format,
                output,
            )
            .await
        }
        Commands::Import {
            page,
            all,
            html,
            css,
            api_url,
            frame,
            scene,
            format,
            output,
        } => {
            run_import(
                &raw_args,
                args.config,
                page,
                all,
                html,
                css,
                api_url,
                frame,
                scene,
                format,
                output,
            )
            .await
        }
        Commands::Tokens { format, output } => run_tokens(format, output),
        Commands::Health {
            api_url,
            format,
            output,
        } => run_health(&raw_args, args.config, api_url, format, output).await,
        Commands::SaveConfig {
            api_url,
            localhost_url,
            auto_sync,
            watch_mode,
            sync_colors,
            sync_typography,
            format,
            output,
        } => {
            let patch = SyncConfigPatch {
                localhost_url,
                auto_sync,
                watch_mode,
                sync_colors,
                sync_typography,
                ..SyncConfigPatch::default()
            };
            run_save_config(&raw_args, args.config, api_url, patch, format, output).await
        }
        Commands::Watch {
            nodes,
            target_file,
            target_css,
            api_url,
            interval,
            format,
            output,
        } => {
            run_watch(
                &raw_args,
                args.config,
                args.verbose,
                nodes,
                target_file,
                target_css,
                api_url,
                interval,
                format,
                output,
            )
            .await
        }
        Commands::Host {
            document,
            api_url,
            frame,
        } => run_host(&raw_args, args.config, document, api_url, frame).await,
    }
}
