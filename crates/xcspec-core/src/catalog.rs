//! Resources grouped by the domain that owns them

use serde::Serialize;
use std::collections::BTreeMap;

use crate::domains::DomainRegistry;
use crate::error::{CoreError, Result};
use openapi_engine::{extract_domain_from_file, ResourceEntry, SpecMapper};

/// A resource together with its domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub resource_name: String,
    pub spec_file: String,
    /// Canonical domain, when one could be determined
    pub domain: Option<String>,
}

/// Joins the resource index with the domain registry
pub struct ResourceCatalog<'a> {
    mapper: &'a SpecMapper,
    registry: &'a DomainRegistry,
}

impl<'a> ResourceCatalog<'a> {
    pub fn new(mapper: &'a SpecMapper, registry: &'a DomainRegistry) -> Self {
        Self { mapper, registry }
    }

    /// Domain of a resource: the schema's `x-ves-cli-domain` when set,
    /// otherwise the domain named by its spec file
    ///
    /// Names that are aliases resolve to their canonical domain; names the
    /// registry does not know are returned as they are.
    pub fn domain_of(&self, resource_name: &str) -> Option<String> {
        self.mapper
            .lookup(resource_name)
            .and_then(|entry| self.entry_domain(entry))
    }

    fn entry_domain(&self, entry: &ResourceEntry) -> Option<String> {
        let raw = entry
            .cli_domain
            .clone()
            .filter(|domain| !domain.is_empty())
            .or_else(|| extract_domain_from_file(&entry.spec_file))?;

        Some(
            self.registry
                .resolve(&raw)
                .map(str::to_string)
                .unwrap_or(raw),
        )
    }

    /// Every indexed resource with its domain, sorted by resource name
    pub fn entries(&self) -> Vec<CatalogEntry> {
        self.mapper
            .entries()
            .map(|entry| CatalogEntry {
                resource_name: entry.resource_name.clone(),
                spec_file: entry.spec_file.clone(),
                domain: self.entry_domain(entry),
            })
            .collect()
    }

    /// Resources of one domain, by canonical name or alias, sorted
    pub fn resources_in_domain(&self, name_or_alias: &str) -> Result<Vec<String>> {
        let domain = self
            .registry
            .resolve(name_or_alias)
            .ok_or_else(|| CoreError::UnknownDomain(name_or_alias.to_string()))?;

        Ok(self
            .entries()
            .into_iter()
            .filter(|entry| entry.domain.as_deref() == Some(domain))
            .map(|entry| entry.resource_name)
            .collect())
    }

    /// Resource names per domain; resources without a domain are left out
    pub fn by_domain(&self) -> BTreeMap<String, Vec<String>> {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for entry in self.entries() {
            if let Some(domain) = entry.domain {
                grouped.entry(domain).or_default().push(entry.resource_name);
            }
        }
        grouped
    }
}
