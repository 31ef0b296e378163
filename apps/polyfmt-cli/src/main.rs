//! Polyfmt CLI - format files with the formatter your project asks for.
//!
//! Reads a buffer on stdin (or files on disk), picks SwiftFormat,
//! swift-format, clang-format or Prettier based on the configuration files
//! around the source location, and writes the formatted result.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use polyfmt_core::content_type;
use polyfmt_core::{Dispatcher, SettingsStore, TomlSettingsStore};
use polyfmt_edit::EditScript;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// Environment variable that overrides the settings file location.
const SETTINGS_ENV: &str = "POLYFMT_SETTINGS";

/// Polyfmt - per-file code formatter dispatcher
///
/// Chooses an external formatter from the config files found next to the
/// source file and runs it on a temporary copy.
#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file to use instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    settings: Option<PathBuf>,
}

/// Available polyfmt commands
#[derive(Subcommand)]
enum Commands {
    /// Format text read from stdin
    ///
    /// Prints the formatted text to stdout. With --edits, prints the JSON
    /// line edit script that turns the input into the formatted text.
    Format {
        /// Content type of the input (e.g. "public.swift-source" or "swift")
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        content_type: Option<String>,

        /// Where the buffer lives on disk; anchors config discovery
        #[arg(short, long, value_name = "PATH")]
        path: Option<PathBuf>,

        /// Print a line edit script instead of the formatted text
        #[arg(long)]
        edits: bool,
    },

    /// Show which formatter would handle a file
    Resolve {
        /// Content type of the file; inferred from its extension if omitted
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        content_type: Option<String>,

        /// Source file or directory
        #[arg(short, long, value_name = "PATH")]
        path: PathBuf,
    },

    /// Format files in place
    ///
    /// Every file is an independent request; files are processed
    /// concurrently.
    Fix {
        /// Files to format
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Inspect or change global settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

/// Settings subcommands
#[derive(Subcommand)]
enum SettingsAction {
    /// Print the current settings
    Show,

    /// Set a value, e.g. `clang-format.executable_path /usr/bin/clang-format`
    Set {
        /// Dotted key (`<tool>.executable_path`, `<tool>.style`,
        /// `<tool>.arguments` or `search_path`)
        key: String,

        /// New value
        value: String,
    },

    /// Clear a value
    Unset {
        /// Dotted key
        key: String,
    },

    /// Print the settings file location
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing subscriber
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = run_command(cli).await {
        // Log with tracing
        error!("Command failed: {:#}", e);
        // Also print to stderr for CLI users
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Initialize tracing subscriber for structured logging
///
/// Logs go to stderr; stdout carries formatted output.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = if verbose {
        EnvFilter::new("polyfmt=debug,polyfmt_core=debug")
    } else {
        EnvFilter::new("polyfmt=info,polyfmt_core=info")
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();
}

/// Execute the specified command
async fn run_command(cli: Cli) -> Result<()> {
    let settings_path = resolve_settings_path(cli.settings)?;
    let store = Arc::new(TomlSettingsStore::new(&settings_path));

    match cli.command {
        Commands::Format {
            content_type,
            path,
            edits,
        } => run_format(store, content_type, path.as_deref(), edits),
        Commands::Resolve { content_type, path } => run_resolve(store, content_type, &path),
        Commands::Fix { files } => {
            info!("Formatting {} file(s)", files.len());
            run_fix(store, files).await
        }
        Commands::Settings { action } => run_settings(&store, action),
    }
}

/// Settings file location: `--settings`, then `$POLYFMT_SETTINGS`, then the
/// user config directory.
fn resolve_settings_path(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    if let Some(path) = std::env::var_os(SETTINGS_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    let config_dir =
        dirs::config_dir().context("Failed to determine the user config directory")?;
    Ok(config_dir.join("polyfmt").join("settings.toml"))
}

/// Content type from `--type`, or inferred from the path's extension.
fn content_type_for(explicit: Option<String>, path: Option<&Path>) -> Result<String> {
    if let Some(content_type) = explicit {
        return Ok(content_type);
    }
    let extension = path
        .and_then(Path::extension)
        .map(|ext| ext.to_string_lossy().to_string())
        .context("--type is required when --path has no extension")?;
    Ok(content_type::for_extension(&extension))
}

/// Run the format command
fn run_format(
    store: Arc<TomlSettingsStore>,
    content_type: Option<String>,
    path: Option<&Path>,
    edits: bool,
) -> Result<()> {
    let content_type = content_type_for(content_type, path)?;

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read input from stdin")?;

    let dispatcher = Dispatcher::standard(store);
    let formatted = dispatcher.format_editing_file(&input, &content_type, path)?;

    if edits {
        let script = EditScript::diff_text(&input, &formatted);
        let json = serde_json::to_string_pretty(&script).context("Failed to encode edits")?;
        println!("{json}");
    } else {
        print!("{formatted}");
    }

    Ok(())
}

/// Run the resolve command
fn run_resolve(
    store: Arc<TomlSettingsStore>,
    content_type: Option<String>,
    path: &Path,
) -> Result<()> {
    let content_type = content_type_for(content_type, Some(path))?;
    let dispatcher = Dispatcher::standard(store);
    let resolution = dispatcher
        .resolve(&content_type, Some(path))
        .context("Failed to resolve formatter")?;

    let display = |p: Option<&Path>| {
        p.map_or_else(|| "-".to_string(), |p| p.display().to_string())
    };

    println!("content type:   {content_type}");
    match resolution.formatter {
        Some(formatter) => println!("formatter:      {}", formatter.id()),
        None => println!("formatter:      none"),
    }
    println!("config file:    {}", display(resolution.config_file.as_deref()));
    println!("search root:    {}", display(resolution.search_root.as_deref()));
    if let Some(project) = &resolution.project_config {
        let json = serde_json::to_string(project).context("Failed to encode project config")?;
        println!("project config: {json}");
    }

    Ok(())
}

/// Outcome of formatting one file in place.
enum FixOutcome {
    Changed,
    Unchanged,
}

/// Run the fix command
async fn run_fix(store: Arc<TomlSettingsStore>, files: Vec<PathBuf>) -> Result<()> {
    let dispatcher = Arc::new(Dispatcher::standard(store));

    let tasks = files.into_iter().map(|file| {
        let dispatcher = dispatcher.clone();
        tokio::task::spawn_blocking(move || {
            let outcome = fix_file(&dispatcher, &file);
            (file, outcome)
        })
    });

    let mut failed = 0;
    for joined in futures::future::join_all(tasks).await {
        let (file, outcome) = joined.context("Formatting task panicked")?;
        match outcome {
            Ok(FixOutcome::Changed) => println!("formatted {}", file.display()),
            Ok(FixOutcome::Unchanged) => println!("unchanged {}", file.display()),
            Err(e) => {
                failed += 1;
                error!("{}: {:#}", file.display(), e);
            }
        }
    }

    if failed > 0 {
        bail!("{failed} file(s) could not be formatted");
    }
    Ok(())
}

fn fix_file(dispatcher: &Dispatcher, file: &Path) -> Result<FixOutcome> {
    let content_type = content_type_for(None, Some(file))?;
    let fs = dispatcher.tools.fs.as_ref();

    let original = fs.read_to_string(file)?;
    let formatted = dispatcher.format_editing_file(&original, &content_type, Some(file))?;

    if formatted == original {
        return Ok(FixOutcome::Unchanged);
    }
    fs.write(file, &formatted)?;
    Ok(FixOutcome::Changed)
}

/// Run a settings subcommand
fn run_settings(store: &TomlSettingsStore, action: SettingsAction) -> Result<()> {
    match action {
        SettingsAction::Show => {
            let settings = store.load().context("Failed to load settings")?;
            let text = toml::to_string_pretty(&settings).context("Failed to encode settings")?;
            println!("# {}", store.path().display());
            println!("# effective search_path = {:?}", settings.search_path());
            print!("{text}");
        }
        SettingsAction::Set { key, value } => {
            store
                .update(&key, &value)
                .with_context(|| format!("Failed to set {key}"))?;
            info!("Set {} in {}", key, store.path().display());
        }
        SettingsAction::Unset { key } => {
            store
                .update(&key, "")
                .with_context(|| format!("Failed to unset {key}"))?;
            info!("Unset {} in {}", key, store.path().display());
        }
        SettingsAction::Path => println!("{}", store.path().display()),
    }
    Ok(())
}
