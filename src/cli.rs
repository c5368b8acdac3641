use clap::{Parser, Subcommand, ValueEnum};
use figsync_lib::FrameSize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "figsync")]
#[command(
    version,
    about = "Figma Localhost Sync - Move designs between Figma and a local dev server",
    long_about = "Figma Localhost Sync (figsync)\n\nCommands:\n- generate: turn a node snapshot (JSON file or Figma URL) into HTML/CSS.\n- export: generate and send the result to the sync server.\n- import: rebuild design nodes from a page's HTML/CSS.\n- watch: re-export on an interval.\n- host: run the plugin message host over stdin/stdout.\n\nUse --help on any subcommand for details."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable verbose (debug) logging on stderr")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML) with server URLs, frame size and timeouts; CLI flags override config"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate HTML/CSS from a node snapshot
    Generate {
        #[arg(long, help = "Node snapshot (.json file) or Figma URL with node-id")]
        nodes: String,

        #[arg(long, value_name = "PATH", help = "Write generated HTML to this file")]
        html_out: Option<PathBuf>,

        #[arg(long, value_name = "PATH", help = "Write generated CSS to this file")]
        css_out: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },

    /// Generate HTML/CSS and send it to the sync server
    Export {
        #[arg(long, help = "Node snapshot (.json file) or Figma URL with node-id")]
        nodes: String,

        #[arg(long, help = "Project-relative HTML file the server should write")]
        target_file: String,

        #[arg(long, help = "Project-relative CSS file the server should write")]
        target_css: Option<String>,

        #[arg(long, help = "Ask the server to replace existing files")]
        overwrite: bool,

        #[arg(long, value_name = "URL", default_value = "http://localhost:8001", help = "Sync server base URL")]
        api_url: String,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },

    /// Build design nodes from HTML/CSS (served page or local files)
    Import {
        #[arg(long, conflicts_with_all = ["all", "html"], help = "Page name served by the sync server")]
        page: Option<String>,

        #[arg(long, conflicts_with = "html", help = "Import every page the sync server knows")]
        all: bool,

        #[arg(long, value_name = "PATH", help = "Local HTML file (no server needed)")]
        html: Option<PathBuf>,

        #[arg(long, value_name = "PATH", requires = "html", help = "Local CSS file for --html")]
        css: Option<PathBuf>,

        #[arg(long, value_name = "URL", default_value = "http://localhost:8001", help = "Sync server base URL")]
        api_url: String,

        #[arg(long, default_value = "1440x1024", help = "Size of the hosting frame (WIDTHxHEIGHT)")]
        frame: FrameSize,

        #[arg(long, help = "Include every created node in the output")]
        scene: bool,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },

    /// Print the design-token bundle
    Tokens {
        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },

    /// Check that the sync server is reachable
    Health {
        #[arg(long, value_name = "URL", default_value = "http://localhost:8001", help = "Sync server base URL")]
        api_url: String,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },

    /// Push sync settings to the sync server
    SaveConfig {
        #[arg(long, value_name = "URL", default_value = "http://localhost:8001", help = "Sync server base URL")]
        api_url: String,

        #[arg(long, value_name = "URL", help = "Dev server URL the exported files are served from")]
        localhost_url: Option<String>,

        #[arg(long, value_name = "BOOL", help = "Enable automatic sync")]
        auto_sync: Option<bool>,

        #[arg(long, value_name = "BOOL", help = "Enable watch mode")]
        watch_mode: Option<bool>,

        #[arg(long, value_name = "BOOL", help = "Sync colors")]
        sync_colors: Option<bool>,

        #[arg(long, value_name = "BOOL", help = "Sync typography")]
        sync_typography: Option<bool>,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },

    /// Re-export a snapshot on an interval until interrupted
    Watch {
        #[arg(long, help = "Node snapshot (.json file) or Figma URL with node-id")]
        nodes: String,

        #[arg(long, help = "Project-relative HTML file the server should write")]
        target_file: String,

        #[arg(long, help = "Project-relative CSS file the server should write")]
        target_css: Option<String>,

        #[arg(long, value_name = "URL", default_value = "http://localhost:8001", help = "Sync server base URL")]
        api_url: String,

        #[arg(long, value_parser = humantime_serde::re::humantime::parse_duration, default_value = "30s", help = "Delay between sync cycles (e.g. 30s, 2m)")]
        interval: Duration,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },

    /// Run the plugin host: JSON messages on stdin, notifications on stdout
    Host {
        #[arg(long, value_name = "PATH", help = "Node snapshot used as the current selection")]
        document: Option<PathBuf>,

        #[arg(long, value_name = "URL", default_value = "http://localhost:8001", help = "Sync server base URL")]
        api_url: String,

        #[arg(long, default_value = "1440x1024", help = "Size of the hosting frame (WIDTHxHEIGHT)")]
        frame: FrameSize,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Pretty,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands, OutputFormat};
    use clap::Parser;
    use std::time::Duration;

    #[test]
    fn export_command_uses_defaults() {
        let cli = Cli::parse_from([
            "figsync",
            "export",
            "--nodes",
            "nodes.json",
            "--target-file",
            "pages/home.html",
        ]);

        assert!(!cli.verbose);
        assert!(cli.config.is_none());

        match cli.command {
            Commands::Export {
                nodes,
                target_file,
                target_css,
                overwrite,
                api_url,
                format,
                output,
            } => {
                assert_eq!(nodes, "nodes.json");
                assert_eq!(target_file, "pages/home.html");
                assert!(target_css.is_none());
                assert!(!overwrite);
                assert_eq!(api_url, "http://localhost:8001");
                assert!(matches!(format, OutputFormat::Json));
                assert!(output.is_none());
            }
            _ => panic!("expected export command"),
        }
    }

    #[test]
    fn import_command_respects_overrides() {
        let cli = Cli::parse_from([
            "figsync",
            "import",
            "--html",
            "page.html",
            "--css",
            "page.css",
            "--frame",
            "800x600",
            "--format",
            "pretty",
            "--config",
            "figsync.toml",
        ]);

        assert_eq!(
            cli.config.as_deref(),
            Some(std::path::Path::new("figsync.toml"))
        );
        match cli.command {
            Commands::Import {
                page,
                all,
                html,
                css,
                frame,
                format,
                ..
            } => {
                assert!(page.is_none());
                assert!(!all);
                assert_eq!(html.as_deref(), Some(std::path::Path::new("page.html")));
                assert_eq!(css.as_deref(), Some(std::path::Path::new("page.css")));
                assert_eq!((frame.width, frame.height), (800, 600));
                assert!(matches!(format, OutputFormat::Pretty));
            }
            _ => panic!("expected import command with overrides"),
        }
    }

    #[test]
    fn import_page_conflicts_with_all() {
        let result = Cli::try_parse_from(["figsync", "import", "--page", "index", "--all"]);
        assert!(result.is_err());
    }

    #[test]
    fn watch_interval_parses_humantime() {
        let cli = Cli::parse_from([
            "figsync",
            "--verbose",
            "watch",
            "--nodes",
            "n.json",
            "--target-file",
            "a.html",
            "--interval",
            "2m",
        ]);

        assert!(cli.verbose);
        match cli.command {
            Commands::Watch { interval, .. } => assert_eq!(interval, Duration::from_secs(120)),
            _ => panic!("expected watch command"),
        }
    }
}
