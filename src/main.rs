use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gradlemeta::cli::SyncArgs;
use gradlemeta::cli::commands;
use gradlemeta::{Config, ConfigLoader, DialectMode};

#[derive(Parser)]
#[command(name = "gradlemeta")]
#[command(
    version,
    about = "Extract Gradle build metadata and sync it to a software catalog"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, global = true, help = "Config file (skips global and project lookup)")]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract metadata from a single build file
    Extract {
        #[arg(help = "build.gradle or build.gradle.kts")]
        build_file: PathBuf,
        #[arg(long, short, help = "gradle-wrapper.properties (default: next to the build file)")]
        wrapper: Option<PathBuf>,
        #[arg(long, short, help = "Plugin grammar: auto, groovy, kotlin, merge")]
        dialect: Option<DialectMode>,
        #[arg(
            short = 'f',
            long,
            default_value = "json",
            help = "Output format: json, yaml, text"
        )]
        format: String,
    },

    /// Extract every Gradle project under a directory
    Scan {
        #[arg(default_value = ".", help = "Directory to scan")]
        path: PathBuf,
        #[arg(long, short, help = "Glob of paths to skip (repeatable)")]
        exclude: Vec<String>,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json, yaml"
        )]
        format: String,
    },

    /// Sync repository metadata into the catalog
    Sync {
        #[arg(long = "repo", short, help = "Repository to sync (repeatable; default: all)")]
        repositories: Vec<String>,
        #[arg(long, help = "Read repositories from a local directory instead of GitHub")]
        local: Option<PathBuf>,
        #[arg(long = "dry-run", help = "Extract and report without upserting")]
        dry_run: bool,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json, yaml"
        )]
        format: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(short = 'g', long, help = "Show global config file only")]
        global: bool,
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json, yaml"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mgradlemeta encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Default hook prints the backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> gradlemeta::Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Loaded before logging so logging.level can apply; errors surface below
    let config = load_config(cli.config.as_deref());

    // RUST_LOG > --verbose/--quiet > logging.level
    let filter = if cli.verbose {
        "debug".to_string()
    } else if cli.quiet {
        "error".to_string()
    } else {
        config
            .as_ref()
            .map(|c| c.logging.filter_directive())
            .unwrap_or_else(|_| "info".to_string())
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Extract {
            build_file,
            wrapper,
            dialect,
            format,
        } => {
            commands::extract::run(&config?, &build_file, wrapper.as_deref(), dialect, &format)?;
        }
        Commands::Scan {
            path,
            exclude,
            format,
        } => {
            commands::scan::run(&config?, &path, exclude, &format)?;
        }
        Commands::Sync {
            repositories,
            local,
            dry_run,
            format,
        } => {
            let config = config?;
            let rt = Runtime::new()?;
            rt.block_on(commands::sync::run(
                &config,
                SyncArgs {
                    repositories,
                    local,
                    dry_run,
                    format,
                },
            ))?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { global, format } => {
                commands::config::show(&config?, global, &format)?;
            }
            ConfigAction::Path => {
                commands::config::path()?;
            }
            ConfigAction::Init { global, force } => {
                commands::config::init(global, force)?;
            }
        },
    }

    Ok(())
}
