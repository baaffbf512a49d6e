//! xcspec - query the OpenAPI spec index and print example payloads
//!
//! Results are printed as JSON on stdout. Diagnostics go to stderr, filtered
//! by `RUST_LOG`, `--verbose` or the `logLevel` setting.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use xcspec_cli::{commands, open_settings, resolve_max_depth, resolve_specs_dir, Workspace};
use xcspec_core::{DomainRegistry, Settings, SettingsManager};

/// Resource index and example generator for OpenAPI-described cloud resources
#[derive(Parser, Debug)]
#[command(name = "xcspec")]
#[command(version)]
#[command(about = "Look up resource schemas and generate example create payloads")]
struct Args {
    /// Directory containing the OpenAPI spec files
    #[arg(long, global = true, env = "XCSPEC_SPECS_DIR")]
    specs_dir: Option<PathBuf>,

    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List indexed resources with their spec file and domain
    Resources {
        /// Only resources of this domain (name or alias)
        #[arg(long)]
        domain: Option<String>,
    },

    /// Show which spec file defines a resource
    Info {
        resource: String,
    },

    /// Print an example create payload for a resource
    Example {
        resource: String,

        /// Synthesize the CreateRequest schema instead of the metadata/spec scaffold
        #[arg(long)]
        raw: bool,

        /// Nesting limit for the generated example
        #[arg(long)]
        max_depth: Option<usize>,

        /// Read the schema from this spec file instead of the spec directory
        #[arg(long)]
        spec_file: Option<PathBuf>,
    },

    /// List resource domains and their aliases
    Domains,

    /// Resolve a domain alias to its canonical name
    ResolveDomain {
        name: String,
    },

    /// Check the spec index for quality issues
    Validate {
        /// Index file to check (defaults to index.json in the spec directory)
        #[arg(long)]
        index: Option<PathBuf>,
    },

    /// List resource names claimed by more than one spec file
    Conflicts,

    /// Show or edit the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the settings file location and its contents
    Show,

    /// Change one setting (specs-dir, max-depth or log-level)
    Set { key: String, value: String },

    /// Restore one setting to its default
    Unset { key: String },

    /// Delete the settings file
    Reset,
}

fn init_logging(verbose: bool, settings: &Settings) {
    let default_directive = if verbose {
        "debug".to_string()
    } else {
        settings.log_level.clone().unwrap_or_else(|| "warn".to_string())
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_config(action: ConfigAction, manager: Option<SettingsManager>) -> Result<Value> {
    let mut manager = manager.ok_or_else(|| {
        anyhow!("no settings location could be determined; pass --config <FILE>")
    })?;

    match action {
        ConfigAction::Show => commands::config_show(&manager),
        ConfigAction::Set { key, value } => commands::config_set(&mut manager, &key, &value),
        ConfigAction::Unset { key } => commands::config_unset(&mut manager, &key),
        ConfigAction::Reset => commands::config_reset(&mut manager),
    }
}

fn run(args: Args, manager: Option<SettingsManager>) -> Result<ExitCode> {
    let defaults = Settings::new();
    let settings = manager.as_ref().map_or(&defaults, SettingsManager::get);
    let specs_dir = resolve_specs_dir(args.specs_dir.as_deref(), settings);
    debug!("Using spec directory {}", specs_dir.display());

    match args.command {
        Command::Resources { domain } => {
            let workspace = Workspace::load(&specs_dir)?;
            print_json(&commands::list_resources(&workspace, domain.as_deref())?)?;
        }
        Command::Info { resource } => {
            let workspace = Workspace::load(&specs_dir)?;
            print_json(&commands::resource_info(&workspace, &resource)?)?;
        }
        Command::Example {
            resource,
            raw,
            max_depth,
            spec_file,
        } => {
            let max_depth = resolve_max_depth(max_depth, settings);
            let value = match spec_file {
                Some(path) => commands::example_from_file(&path, &resource, raw, max_depth)?,
                None => {
                    let workspace = Workspace::load(&specs_dir)?;
                    commands::example(&workspace, &resource, raw, max_depth)?
                }
            };
            print_json(&value)?;
        }
        Command::Domains => {
            print_json(&commands::list_domains(&DomainRegistry::builtin())?)?;
        }
        Command::ResolveDomain { name } => {
            print_json(&commands::resolve_domain(&DomainRegistry::builtin(), &name)?)?;
        }
        Command::Validate { index } => {
            let report = match index {
                Some(path) => commands::validate(&commands::read_index(&path)?),
                None => commands::validate_workspace(&Workspace::load(&specs_dir)?)?,
            };
            print_json(&serde_json::to_value(&report)?)?;
            if report.has_critical() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Conflicts => {
            let workspace = Workspace::load(&specs_dir)?;
            print_json(&commands::conflicts(&workspace)?)?;
        }
        Command::Config { action } => {
            let value = run_config(action, manager)?;
            print_json(&value)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let args = Args::parse();
    let settings_file = args
        .config
        .clone()
        .or_else(SettingsManager::default_settings_file);

    let (manager, settings_error) = match &settings_file {
        Some(path) => {
            let (manager, error) = open_settings(path);
            (Some(manager), error)
        }
        None => (None, None),
    };

    let defaults = Settings::new();
    init_logging(args.verbose, manager.as_ref().map_or(&defaults, SettingsManager::get));

    if let (Some(path), Some(e)) = (&settings_file, settings_error) {
        warn!("Ignoring unreadable settings {}: {}", path.display(), e);
    }
    if settings_file.is_none() {
        debug!("No home directory found, using default settings");
    }

    match run(args, manager) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
