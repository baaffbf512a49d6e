//! Loads a directory of spec files into a `file name -> Spec` table

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{ParseError, ParseResult};
use crate::parser::OpenApiParser;
use crate::types::Spec;
use crate::validation::SpecIndex;

/// Metadata file shipped next to the domain specs
pub const INDEX_FILE: &str = "index.json";

/// A spec file that could not be parsed
#[derive(Debug)]
pub struct LoadFailure {
    /// File name within the spec directory
    pub file: String,
    pub error: ParseError,
}

/// Result of loading a spec directory
#[derive(Debug, Default)]
pub struct LoadedSpecs {
    /// File name -> parsed spec, sorted by file name
    pub specs: BTreeMap<String, Spec>,
    /// Files that failed to parse, in the order they were tried
    pub failures: Vec<LoadFailure>,
    /// Parsed `index.json`, when the directory has one
    pub index: Option<SpecIndex>,
}

/// Load every `*.json` spec in `dir`
///
/// Files are processed in lexicographic order so later "first match wins"
/// decisions are reproducible. A file that fails to parse is logged and
/// skipped; the call only fails when nothing usable was loaded.
pub fn load_all_specs(dir: impl AsRef<Path>) -> ParseResult<LoadedSpecs> {
    let dir = dir.as_ref();
    let files = spec_files(dir)?;

    if files.is_empty() {
        return Err(ParseError::NoSpecFiles(dir.to_path_buf()));
    }

    let mut loaded = LoadedSpecs::default();

    for (file, path) in files {
        if file == INDEX_FILE {
            loaded.index = load_index(&path);
            continue;
        }

        match OpenApiParser::parse_file(&path) {
            Ok(spec) => {
                debug!("Loaded {} ({} schemas)", file, spec.schemas.len());
                loaded.specs.insert(file, spec);
            }
            Err(e) => {
                warn!("Failed to parse {}: {}", path.display(), e);
                loaded.failures.push(LoadFailure { file, error: e });
            }
        }
    }

    if loaded.specs.is_empty() {
        return Err(ParseError::NoValidSpecs(dir.to_path_buf()));
    }

    info!(
        "Loaded {} spec files from {} ({} failed)",
        loaded.specs.len(),
        dir.display(),
        loaded.failures.len()
    );

    Ok(loaded)
}

/// `*.json` files in `dir`, sorted by file name
fn spec_files(dir: &Path) -> ParseResult<Vec<(String, PathBuf)>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
            files.push((name.to_string(), path.clone()));
        }
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}

fn load_index(path: &Path) -> Option<SpecIndex> {
    let parsed = std::fs::read_to_string(path)
        .map_err(ParseError::from)
        .and_then(|content| serde_json::from_str(&content).map_err(ParseError::from));

    match parsed {
        Ok(index) => Some(index),
        Err(e) => {
            warn!("Ignoring unreadable spec index {}: {}", path.display(), e);
            None
        }
    }
}
