//! Loaded state shared by the subcommands

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use openapi_engine::{load_all_specs, SpecIndex, SpecMapper};
use xcspec_core::{CoreError, DomainRegistry, Settings, SettingsManager};

/// Spec directory used when neither flag, environment nor settings name one
pub const DEFAULT_SPECS_DIR: &str = "docs/specifications/api";

/// Pick the spec directory: flag or environment first, then the settings
/// file, then the built-in default
pub fn resolve_specs_dir(explicit: Option<&Path>, settings: &Settings) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| settings.specs_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SPECS_DIR))
}

/// Pick the example depth limit: flag first, then the settings file
pub fn resolve_max_depth(explicit: Option<usize>, settings: &Settings) -> usize {
    explicit.unwrap_or(settings.max_depth)
}

/// Open the settings file, falling back to defaults when it cannot be read
///
/// The read error is handed back rather than logged so the caller can report
/// it once logging is set up from the settings it got.
pub fn open_settings(settings_file: &Path) -> (SettingsManager, Option<CoreError>) {
    match SettingsManager::load(settings_file) {
        Ok(manager) => (manager, None),
        Err(e) => (SettingsManager::with_defaults(settings_file), Some(e)),
    }
}

/// Indexed specs plus the domain registry
pub struct Workspace {
    pub specs_dir: PathBuf,
    pub mapper: SpecMapper,
    pub registry: DomainRegistry,
    /// Parsed `index.json` of the spec directory, if present
    pub index: Option<SpecIndex>,
    /// Files that were skipped because they failed to parse
    pub skipped: Vec<String>,
}

impl Workspace {
    /// Load and index every spec in `specs_dir`
    pub fn load(specs_dir: &Path) -> Result<Self> {
        let loaded = load_all_specs(specs_dir)
            .with_context(|| format!("Failed to load specs from {}", specs_dir.display()))?;

        let skipped: Vec<String> = loaded.failures.iter().map(|f| f.file.clone()).collect();
        if !skipped.is_empty() {
            warn!("Skipped {} unreadable spec files", skipped.len());
        }

        let mapper = SpecMapper::new(loaded.specs);
        debug!(
            "Indexed {} resources from {}",
            mapper.mapped_resources().len(),
            specs_dir.display()
        );

        Ok(Self {
            specs_dir: specs_dir.to_path_buf(),
            mapper,
            registry: DomainRegistry::builtin(),
            index: loaded.index,
            skipped,
        })
    }
}
