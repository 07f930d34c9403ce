//! Ghostcursor - desktop ghost companion.
//!
//! Command-line front end for plugin discovery, validation and the native
//! input bridge.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use serde_json::Value;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ghostcursor::bridge::{
    key_state_channel, DeliveryError, EventDispatcher, EventSink, NullSampler,
};
use ghostcursor::plugin::{
    list_entries, validate_all, validate_plugin_directory, GhostManifest, IconResolver, LogLevel,
    ModuleResolver, PluginLogStore,
};
use ghostcursor::{Config, MonitorSupervisor, PluginLocator, ValidationResult};

/// Desktop ghost companion
#[derive(Parser)]
#[command(name = "ghostcursor")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to .ghostcursor.toml, then the user config)
    #[arg(short, long, global = true, env = "GHOSTCURSOR_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show existing plugin directories in priority order
    Dirs,

    /// List the entries of a directory
    List {
        /// Directory to list
        dir: PathBuf,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Validate ghost plugins
    Validate {
        /// Plugin root to validate (defaults to every located root)
        dir: Option<PathBuf>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Print a parsed plugin manifest
    Manifest {
        /// Path to manifest.json
        path: PathBuf,
    },

    /// Print the source of a plugin module
    Module {
        /// Plugin directory
        plugin_dir: PathBuf,

        /// Module name (e.g. content, background)
        name: String,
    },

    /// Print an icon as a data URL
    Icon {
        /// Icon path, absolute or relative to a plugin directory
        reference: String,
    },

    /// Manage plugin log files
    Logs {
        #[command(subcommand)]
        operation: LogsOperation,
    },

    /// Run the input bridge and print events as JSON lines
    Monitor {
        /// Stop after this many milliseconds (runs until Ctrl-C otherwise)
        #[arg(short, long)]
        duration_ms: Option<u64>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum LogsOperation {
    /// Append a line to a plugin's log
    Write {
        plugin_id: String,

        /// Level (debug, info, warn, error)
        #[arg(short, long, default_value = "info")]
        level: LogLevel,

        message: String,
    },

    /// Show the last lines of a plugin's log
    Read {
        plugin_id: String,

        /// Maximum number of lines (0 for all)
        #[arg(short = 'n', long, default_value_t = 100)]
        lines: usize,
    },

    /// Empty a plugin's log
    Clear { plugin_id: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();

    let config = match cli.config {
        Some(ref path) => Config::load_from_file(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Dirs => cmd_dirs(&config),
        Commands::List { dir, format } => cmd_list(&dir, &format)?,
        Commands::Validate { dir, format } => cmd_validate(&config, dir.as_deref(), &format)?,
        Commands::Manifest { path } => cmd_manifest(&path)?,
        Commands::Module { plugin_dir, name } => cmd_module(&plugin_dir, &name)?,
        Commands::Icon { reference } => cmd_icon(&config, &reference)?,
        Commands::Logs { operation } => cmd_logs(&config, operation)?,
        Commands::Monitor { duration_ms } => cmd_monitor(&config, duration_ms)?,
        Commands::Completions { shell } => cmd_completions(shell),
    }

    Ok(())
}

/// Print existing plugin roots.
fn cmd_dirs(config: &Config) {
    let locator = PluginLocator::from_config(config);
    for root in locator.existing_roots() {
        println!("{}", root.display());
    }
}

/// List a directory's entries.
fn cmd_list(dir: &Path, format: &str) -> Result<()> {
    let entries = list_entries(dir)?;

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&entries)?;
            println!("{json}");
        }
        _ => {
            for entry in &entries {
                let marker = if entry.is_directory { "/" } else { "" };
                println!("{}{}", entry.name, marker);
            }
        }
    }

    Ok(())
}

/// Validate one root or every located root.
fn cmd_validate(config: &Config, dir: Option<&Path>, format: &str) -> Result<()> {
    let results = match dir {
        Some(dir) => validate_plugin_directory(dir),
        None => validate_all(&PluginLocator::from_config(config)),
    };

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&results)?;
            println!("{json}");
        }
        _ => print_validation(&results),
    }

    Ok(())
}

fn print_validation(results: &[ValidationResult]) {
    if results.is_empty() {
        println!("No plugins found.");
        return;
    }

    for result in results {
        let icon = if result.is_valid { "✓" } else { "✗" };
        let name = result
            .parsed_manifest()
            .map(|m| m.name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| result.dir_name());
        println!("  {} {} ({})", icon, name, result.plugin_path.display());

        for error in &result.errors {
            println!("      - {}", error);
        }
    }

    let valid = results.iter().filter(|r| r.is_valid).count();
    println!("\nTotal: {} plugin(s), {} valid", results.len(), valid);
}

/// Print a manifest as JSON.
fn cmd_manifest(path: &Path) -> Result<()> {
    let manifest = GhostManifest::from_file(path)?;
    println!("{}", serde_json::to_string_pretty(&manifest)?);
    Ok(())
}

/// Print a module's source.
fn cmd_module(plugin_dir: &Path, name: &str) -> Result<()> {
    let source = ModuleResolver.read(plugin_dir, name)?;
    print!("{source}");
    Ok(())
}

/// Print an icon data URL.
fn cmd_icon(config: &Config, reference: &str) -> Result<()> {
    let resolver =
        IconResolver::new(PluginLocator::from_config(config), &config.plugins.default_icon);
    println!("{}", resolver.data_url(reference)?);
    Ok(())
}

/// Handle plugin log operations.
fn cmd_logs(config: &Config, operation: LogsOperation) -> Result<()> {
    let dir = config
        .log_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    let store = PluginLogStore::new(dir);

    match operation {
        LogsOperation::Write { plugin_id, level, message } => {
            store.write(&plugin_id, level, &message)?;
        }
        LogsOperation::Read { plugin_id, lines } => {
            for line in store.read(&plugin_id, lines)? {
                println!("{line}");
            }
        }
        LogsOperation::Clear { plugin_id } => {
            store.clear(&plugin_id)?;
            println!("Cleared logs for '{plugin_id}'");
        }
    }

    Ok(())
}

/// Prints each event as one JSON line.
struct StdoutSink;

impl EventSink for StdoutSink {
    fn deliver(&self, name: &str, payload: Value) -> Result<(), DeliveryError> {
        let line = serde_json::json!({ "name": name, "payload": payload });
        println!("{line}");
        Ok(())
    }
}

/// Run the bridge loops until Ctrl-C or the requested duration.
fn cmd_monitor(config: &Config, duration_ms: Option<u64>) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        let dispatcher = Arc::new(EventDispatcher::with_sink(Arc::new(StdoutSink)));
        let mut supervisor =
            MonitorSupervisor::new(Arc::new(NullSampler), dispatcher, config.monitor.clone());

        // No native key monitor here: report the empty key set once and
        // keep the sender alive so the feed stays open.
        let (keys, receiver) = key_state_channel();
        supervisor.start_key_monitoring(receiver);
        keys.push("");

        supervisor.start_ghost_watch();
        supervisor.start_pointer_monitoring();
        supervisor.start_shortcut_monitoring();

        match duration_ms {
            Some(ms) => tokio::time::sleep(Duration::from_millis(ms)).await,
            None => tokio::signal::ctrl_c().await?,
        }

        supervisor.shutdown();
        drop(keys);
        Ok::<(), anyhow::Error>(())
    })
}

/// Generate shell completions.
fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "ghostcursor", &mut io::stdout());
}
