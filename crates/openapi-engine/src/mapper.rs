//! Resource index: maps resource names to the spec file defining them

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tracing::debug;

use crate::example::ExampleGenerator;
use crate::naming;
use crate::types::Spec;

/// A resource discovered from a CreateRequest schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEntry {
    /// Canonical snake_case resource name
    pub resource_name: String,
    /// Spec file that defines the resource
    pub spec_file: String,
    /// Name of the CreateRequest schema the resource was discovered from
    pub schema_name: String,
    /// `x-ves-cli-domain` of that schema, if set
    pub cli_domain: Option<String>,
}

/// A later spec file claiming an already indexed resource name
///
/// The first file (in sorted order) keeps the resource; later claims are
/// recorded here so they can be reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceConflict {
    pub resource_name: String,
    /// File that owns the resource
    pub kept: String,
    /// File whose claim was ignored
    pub ignored: String,
}

/// What the index knows about a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSpecInfo {
    /// Canonical name when the resource is known, otherwise the name asked for
    pub resource_name: String,
    pub spec_file: Option<String>,
    pub has_create_schema: bool,
    pub has_spec_schema: bool,
}

impl ResourceSpecInfo {
    /// Whether the resource resolved to a spec file
    pub fn is_known(&self) -> bool {
        self.spec_file.is_some()
    }
}

/// Maps resource names to their spec files
///
/// Built once from the loaded spec table and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct SpecMapper {
    /// File name -> spec
    specs: BTreeMap<String, Spec>,
    /// Lowercase canonical resource name -> entry
    resources: BTreeMap<String, ResourceEntry>,
    conflicts: Vec<ResourceConflict>,
}

impl SpecMapper {
    /// Create a new spec mapper from loaded specs
    pub fn new(specs: BTreeMap<String, Spec>) -> Self {
        let mut mapper = Self {
            specs,
            resources: BTreeMap::new(),
            conflicts: Vec::new(),
        };
        mapper.build_resource_map();
        mapper
    }

    /// Scan every spec for CreateRequest schemas, in sorted file order
    fn build_resource_map(&mut self) {
        for (file, spec) in &self.specs {
            for (resource_name, (schema_name, schema)) in spec.find_all_resource_schemas() {
                match self.resources.entry(resource_name.to_lowercase()) {
                    Entry::Vacant(slot) => {
                        slot.insert(ResourceEntry {
                            resource_name,
                            spec_file: file.clone(),
                            schema_name: schema_name.to_string(),
                            cli_domain: schema.cli_domain.clone(),
                        });
                    }
                    Entry::Occupied(existing) => {
                        debug!(
                            "Resource {} already defined by {}, ignoring {}",
                            resource_name,
                            existing.get().spec_file,
                            file
                        );
                        self.conflicts.push(ResourceConflict {
                            resource_name,
                            kept: existing.get().spec_file.clone(),
                            ignored: file.clone(),
                        });
                    }
                }
            }
        }

        debug!(
            "Indexed {} resources from {} specs ({} conflicting claims)",
            self.resources.len(),
            self.specs.len(),
            self.conflicts.len()
        );
    }

    /// Resolve a resource name: exact (case-insensitive) match first, then
    /// the first entry in sorted order that matches ignoring underscores
    pub fn lookup(&self, resource_name: &str) -> Option<&ResourceEntry> {
        if let Some(entry) = self.resources.get(&resource_name.to_lowercase()) {
            return Some(entry);
        }

        let wanted = naming::fuzzy_key(resource_name);
        self.resources
            .iter()
            .find(|(name, _)| naming::fuzzy_key(name) == wanted)
            .map(|(_, entry)| entry)
    }

    /// Find the OpenAPI spec for a given resource name
    pub fn find_spec(&self, resource_name: &str) -> Option<&Spec> {
        self.lookup(resource_name)
            .and_then(|entry| self.specs.get(&entry.spec_file))
    }

    /// File name of the spec for a given resource
    pub fn find_spec_file(&self, resource_name: &str) -> Option<&str> {
        self.lookup(resource_name).map(|entry| entry.spec_file.as_str())
    }

    /// Information about a resource's spec
    pub fn resource_info(&self, resource_name: &str) -> ResourceSpecInfo {
        let resolved = self
            .lookup(resource_name)
            .and_then(|entry| Some((entry, self.specs.get(&entry.spec_file)?)));

        let Some((entry, spec)) = resolved else {
            return ResourceSpecInfo {
                resource_name: resource_name.to_string(),
                spec_file: None,
                has_create_schema: false,
                has_spec_schema: false,
            };
        };

        let names = [entry.resource_name.as_str(), resource_name];
        ResourceSpecInfo {
            resource_name: entry.resource_name.clone(),
            spec_file: Some(entry.spec_file.clone()),
            has_create_schema: names
                .iter()
                .any(|name| spec.find_create_request_schema(name).is_some()),
            has_spec_schema: names
                .iter()
                .any(|name| spec.find_create_spec_type_schema(name).is_some()),
        }
    }

    /// Create request scaffold (metadata plus spec body) for a resource
    ///
    /// `None` when the resource is unknown or has no CreateSpecType schema.
    pub fn generate_example_for_resource(
        &self,
        resource_name: &str,
        max_depth: usize,
    ) -> Option<Value> {
        let entry = self.lookup(resource_name)?;
        let spec = self.specs.get(&entry.spec_file)?;
        let generator = ExampleGenerator::new(spec).with_max_depth(max_depth);

        generator
            .generate_create_request_example(&entry.resource_name)
            .or_else(|| generator.generate_create_request_example(resource_name))
    }

    /// Example of the resource's CreateRequest schema as a whole
    pub fn generate_request_example_for_resource(
        &self,
        resource_name: &str,
        max_depth: usize,
    ) -> Option<Value> {
        let entry = self.lookup(resource_name)?;
        let spec = self.specs.get(&entry.spec_file)?;

        ExampleGenerator::new(spec)
            .with_max_depth(max_depth)
            .synthesize_named(&entry.schema_name)
    }

    /// All canonical resource names, sorted
    pub fn mapped_resources(&self) -> Vec<&str> {
        self.resources
            .values()
            .map(|entry| entry.resource_name.as_str())
            .collect()
    }

    /// All index entries, sorted by resource name
    pub fn entries(&self) -> impl Iterator<Item = &ResourceEntry> {
        self.resources.values()
    }

    /// Claims ignored because an earlier file owned the name
    pub fn conflicts(&self) -> &[ResourceConflict] {
        &self.conflicts
    }

    /// Number of loaded specs
    pub fn spec_count(&self) -> usize {
        self.specs.len()
    }

    /// Loaded specs by file name
    pub fn specs(&self) -> &BTreeMap<String, Spec> {
        &self.specs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::OpenApiParser;
    use serde_json::json;

    fn spec(schemas: Value) -> Spec {
        let document = json!({
            "openapi": "3.0.3",
            "info": {"title": "test", "version": "1"},
            "components": {"schemas": schemas},
        });
        OpenApiParser::parse_json(&document.to_string()).unwrap()
    }

    fn mapper() -> SpecMapper {
        let mut specs = BTreeMap::new();
        specs.insert(
            "load_balancer.json".to_string(),
            spec(json!({
                "viewshttploadbalancerCreateRequest": {
                    "type": "object",
                    "x-ves-cli-domain": "cdn",
                    "properties": {"spec": {"$ref": "#/components/schemas/viewshttploadbalancerCreateSpecType"}}
                },
                "viewshttploadbalancerCreateSpecType": {
                    "type": "object",
                    "required": ["domains"],
                    "properties": {"domains": {"type": "array", "items": {"type": "string"}}}
                },
                "viewsorigin_poolCreateRequest": {"type": "object"}
            })),
        );
        specs.insert(
            "networking.json".to_string(),
            spec(json!({
                "publicDnsZoneCreateRequest": {
                    "type": "object",
                    "required": ["name"],
                    "properties": {"name": {"type": "string"}}
                },
                "viewsorigin_poolCreateRequest": {"type": "object"}
            })),
        );
        SpecMapper::new(specs)
    }

    #[test]
    fn test_discovers_resources() {
        let mapper = mapper();

        assert_eq!(
            mapper.mapped_resources(),
            vec!["dns_zone", "httploadbalancer", "origin_pool"]
        );
        assert_eq!(mapper.spec_count(), 2);
    }

    #[test]
    fn test_first_file_wins_and_conflict_is_recorded() {
        let mapper = mapper();

        assert_eq!(mapper.find_spec_file("origin_pool"), Some("load_balancer.json"));
        assert_eq!(
            mapper.conflicts(),
            &[ResourceConflict {
                resource_name: "origin_pool".to_string(),
                kept: "load_balancer.json".to_string(),
                ignored: "networking.json".to_string(),
            }]
        );
    }

    #[test]
    fn test_exact_lookup_is_case_insensitive() {
        let mapper = mapper();

        assert_eq!(mapper.find_spec_file("DNS_Zone"), Some("networking.json"));
    }

    #[test]
    fn test_fuzzy_lookup_ignores_underscores() {
        let mapper = mapper();

        assert_eq!(mapper.find_spec_file("http_loadbalancer"), Some("load_balancer.json"));
        assert_eq!(mapper.find_spec_file("httpLoadBalancer"), Some("load_balancer.json"));
        assert_eq!(mapper.find_spec_file("dnszone"), Some("networking.json"));
        assert!(std::ptr::eq(
            mapper.find_spec("http_loadbalancer").unwrap(),
            mapper.find_spec("httploadbalancer").unwrap()
        ));
    }

    #[test]
    fn test_unknown_resource_is_none() {
        let mapper = mapper();

        assert!(mapper.find_spec("tcp_loadbalancer").is_none());
        assert!(mapper.generate_example_for_resource("tcp_loadbalancer", 2).is_none());

        let info = mapper.resource_info("tcp_loadbalancer");
        assert!(!info.is_known());
        assert_eq!(info.resource_name, "tcp_loadbalancer");
    }

    #[test]
    fn test_resource_info() {
        let mapper = mapper();

        let info = mapper.resource_info("http_loadbalancer");
        assert_eq!(
            info,
            ResourceSpecInfo {
                resource_name: "httploadbalancer".to_string(),
                spec_file: Some("load_balancer.json".to_string()),
                has_create_schema: true,
                has_spec_schema: true,
            }
        );

        let info = mapper.resource_info("dns_zone");
        assert!(info.has_create_schema);
        assert!(!info.has_spec_schema);
    }

    #[test]
    fn test_entry_carries_cli_domain() {
        let mapper = mapper();

        let entry = mapper.lookup("http_loadbalancer").unwrap();
        assert_eq!(entry.cli_domain.as_deref(), Some("cdn"));
        assert_eq!(entry.schema_name, "viewshttploadbalancerCreateRequest");
    }

    #[test]
    fn test_generate_example_for_resource() {
        let mapper = mapper();

        assert_eq!(
            mapper.generate_example_for_resource("http_loadbalancer", 2),
            Some(json!({
                "metadata": {"name": "example-httploadbalancer", "namespace": "example-namespace"},
                "spec": {"domains": ["www.example.com"]}
            }))
        );

        // no CreateSpecType: only the raw CreateRequest example exists
        assert_eq!(mapper.generate_example_for_resource("dns_zone", 2), None);
        assert_eq!(
            mapper.generate_request_example_for_resource("dnszone", 2),
            Some(json!({"name": "example-resource"}))
        );
    }
}
