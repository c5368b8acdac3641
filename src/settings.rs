use std::path::Path;
use std::time::Duration;

use figsync_lib::{Config, FrameSize, SyncError};

/// Checks if a flag was present in the command-line arguments.
pub fn flag_present(args: &[String], flag: &str) -> bool {
    args.iter()
        .any(|arg| arg == flag || arg.starts_with(&format!("{flag}=")))
}

/// Tracks which shared CLI flags were explicitly provided vs. defaulted.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlagSources {
    pub api_url: bool,
    pub frame: bool,
    pub interval: bool,
}

impl FlagSources {
    pub fn from_args(args: &[String]) -> Self {
        Self {
            api_url: flag_present(args, "--api-url"),
            frame: flag_present(args, "--frame"),
            interval: flag_present(args, "--interval"),
        }
    }
}

/// Resolved settings after merging CLI args and config file.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    pub api_url: String,
    pub frame: FrameSize,
    pub interval: Duration,
    /// `None` leaves sync-server requests unbounded
    pub request_timeout: Option<Duration>,
}

/// Merge CLI arguments with config file, preferring CLI when flags are present.
pub fn resolve_settings(
    cli_api_url: &str,
    cli_frame: Option<FrameSize>,
    cli_interval: Option<Duration>,
    config: &Config,
    flags: &FlagSources,
) -> ResolvedSettings {
    ResolvedSettings {
        api_url: if flags.api_url {
            cli_api_url.to_string()
        } else {
            config.api_url.clone()
        },
        frame: match cli_frame {
            Some(frame) if flags.frame => frame,
            _ => config.frame,
        },
        interval: match cli_interval {
            Some(interval) if flags.interval => interval,
            _ => config.watch.interval,
        },
        request_timeout: config.timeouts.request,
    }
}

/// Load config from a TOML file, central config, or return defaults.
/// Priority: explicit path > ~/.config/figsync/config.toml > defaults
pub fn load_config(path: Option<&Path>) -> Result<Config, SyncError> {
    let cfg = Config::load(path).map_err(|e| {
        let loc = path
            .map(|p| p.display().to_string())
            .or_else(|| Config::central_config_path().map(|p| p.display().to_string()))
            .unwrap_or_else(|| "defaults".to_string());
        SyncError::Config(format!("Failed to read config {}: {}", loc, e))
    })?;

    cfg.validate().map_err(|e| {
        let prefix = path
            .map(|p| format!("Invalid config ({}): {}", p.display(), e))
            .unwrap_or_else(|| format!("Invalid config: {}", e));
        SyncError::Config(prefix)
    })?;
    Ok(cfg)
}

/// Format effective config as a single-line string.
pub fn format_effective_config(settings: &ResolvedSettings, config_source: Option<&Path>) -> String {
    let source = config_source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    let request_timeout = settings
        .request_timeout
        .map(|t| format!("{}s", t.as_secs()))
        .unwrap_or_else(|| "none".to_string());
    format!(
        "Effective config [{source}]: api_url={}, frame={}, interval={}s, request_timeout={request_timeout}",
        settings.api_url,
        settings.frame,
        settings.interval.as_secs(),
    )
}
