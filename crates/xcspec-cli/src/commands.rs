//! Subcommand implementations
//!
//! Each command returns the JSON value the binary prints, so the output can be
//! checked without spawning a process.

use anyhow::{anyhow, Context, Result};
use serde_json::{json, Value};
use std::path::Path;

use crate::context::Workspace;
use openapi_engine::{
    validate_index, ExampleGenerator, OpenApiParser, SpecIndex, ValidationReport,
};
use xcspec_core::{DomainRegistry, ResourceCatalog, SettingsManager};

fn unknown_resource(name: &str) -> anyhow::Error {
    anyhow!("unknown resource type: {}", name)
}

/// Indexed resources, optionally limited to one domain
pub fn list_resources(workspace: &Workspace, domain: Option<&str>) -> Result<Value> {
    let catalog = ResourceCatalog::new(&workspace.mapper, &workspace.registry);

    match domain {
        Some(domain) => Ok(json!(catalog.resources_in_domain(domain)?)),
        None => Ok(serde_json::to_value(catalog.entries())?),
    }
}

/// Spec file, schema availability and domain of a resource
pub fn resource_info(workspace: &Workspace, name: &str) -> Result<Value> {
    let info = workspace.mapper.resource_info(name);
    if !info.is_known() {
        return Err(unknown_resource(name));
    }

    let catalog = ResourceCatalog::new(&workspace.mapper, &workspace.registry);
    let mut value = serde_json::to_value(&info)?;
    value["domain"] = json!(catalog.domain_of(name));
    Ok(value)
}

/// Example payload for a resource
///
/// The default is the create request scaffold (metadata plus spec body);
/// `raw` synthesizes the CreateRequest schema as it is.
pub fn example(workspace: &Workspace, name: &str, raw: bool, max_depth: usize) -> Result<Value> {
    if workspace.mapper.lookup(name).is_none() {
        return Err(unknown_resource(name));
    }

    let value = if raw {
        workspace.mapper.generate_request_example_for_resource(name, max_depth)
    } else {
        workspace.mapper.generate_example_for_resource(name, max_depth)
    };

    value.ok_or_else(|| no_example(name, raw))
}

fn no_example(name: &str, raw: bool) -> anyhow::Error {
    if raw {
        anyhow!("no example could be generated for {}", name)
    } else {
        anyhow!("{} has no CreateSpecType schema; use --raw for the CreateRequest example", name)
    }
}

/// Example payload for a resource taken from one spec file, bypassing the
/// directory index
pub fn example_from_file(path: &Path, name: &str, raw: bool, max_depth: usize) -> Result<Value> {
    let spec = OpenApiParser::parse_file(path)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    let generator = ExampleGenerator::new(&spec).with_max_depth(max_depth);

    let value = if raw {
        generator.generate_example(name)
    } else {
        generator.generate_create_request_example(name)
    };

    value.ok_or_else(|| anyhow!("{} has no create schema for {}", path.display(), name))
}

/// All domains with their aliases, sorted by name
pub fn list_domains(registry: &DomainRegistry) -> Result<Value> {
    let domains: Vec<_> = registry
        .all_domains()
        .into_iter()
        .filter_map(|name| registry.get(name))
        .collect();
    Ok(serde_json::to_value(domains)?)
}

/// Canonical domain for a name or alias
pub fn resolve_domain(registry: &DomainRegistry, name: &str) -> Result<Value> {
    Ok(serde_json::to_value(registry.require(name)?)?)
}

/// Read a spec index file
pub fn read_index(path: &Path) -> Result<SpecIndex> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Invalid index {}", path.display()))
}

/// Validation report for a spec index
pub fn validate(index: &SpecIndex) -> ValidationReport {
    ValidationReport::build(index, validate_index(index))
}

/// Validation report for the workspace's own `index.json`
pub fn validate_workspace(workspace: &Workspace) -> Result<ValidationReport> {
    let index = workspace.index.as_ref().ok_or_else(|| {
        anyhow!("{} has no index.json", workspace.specs_dir.display())
    })?;
    Ok(validate(index))
}

/// Resource names claimed by more than one spec file
pub fn conflicts(workspace: &Workspace) -> Result<Value> {
    Ok(serde_json::to_value(workspace.mapper.conflicts())?)
}

/// Settings file location and current contents
pub fn config_show(manager: &SettingsManager) -> Result<Value> {
    Ok(json!({
        "file": manager.settings_file(),
        "settings": manager.get(),
    }))
}

/// Change one setting and save the file
pub fn config_set(manager: &mut SettingsManager, key: &str, value: &str) -> Result<Value> {
    let mut settings = manager.get().clone();
    settings.set_value(key, value)?;
    manager
        .update(settings)
        .with_context(|| format!("Failed to save {}", manager.settings_file().display()))?;
    config_show(manager)
}

/// Restore one setting to its default and save the file
pub fn config_unset(manager: &mut SettingsManager, key: &str) -> Result<Value> {
    let mut settings = manager.get().clone();
    settings.unset_value(key)?;
    manager
        .update(settings)
        .with_context(|| format!("Failed to save {}", manager.settings_file().display()))?;
    config_show(manager)
}

/// Delete the settings file
pub fn config_reset(manager: &mut SettingsManager) -> Result<Value> {
    manager
        .reset()
        .with_context(|| format!("Failed to remove {}", manager.settings_file().display()))?;
    config_show(manager)
}
