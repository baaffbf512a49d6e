//! Type definitions for parsed OpenAPI specs

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use crate::naming;
use crate::resolver::RefResolver;

/// Prefix of every local schema reference
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Suffix marking a resource's create request schema
pub const CREATE_REQUEST_SUFFIX: &str = "CreateRequest";

/// Suffix marking a resource's create spec schema
pub const CREATE_SPEC_TYPE_SUFFIX: &str = "CreateSpecType";

/// Prefixes the upstream spec pipeline puts in front of resource schema names
pub const SCHEMA_NAME_PREFIXES: [&str; 2] = ["views", "public"];

/// Structural shape of a schema node
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SchemaNode {
    /// `$ref` to another schema of the same spec, kept verbatim
    Ref(String),
    Object(ObjectSchema),
    Array(Option<Box<Schema>>),
    String,
    Integer,
    Number,
    Boolean,
    /// No `type` and no properties
    #[default]
    Unset,
}

/// Object-only parts of a schema
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    /// Field name -> child schema
    pub properties: BTreeMap<String, Schema>,
    /// Field names listed in `required`
    pub required: BTreeSet<String>,
    /// Group key -> mutually exclusive field names, in declared order
    pub one_of_groups: BTreeMap<String, Vec<String>>,
}

impl ObjectSchema {
    /// Whether a field is required, either by the `required` list or by the
    /// property's own required hint
    pub fn is_required(&self, field: &str) -> bool {
        self.required.contains(field)
            || self
                .properties
                .get(field)
                .map(|prop| prop.required_hint)
                .unwrap_or(false)
    }
}

/// A single OpenAPI schema node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    /// Shape of the node
    pub node: SchemaNode,
    pub title: Option<String>,
    pub description: Option<String>,
    pub format: Option<String>,
    /// `x-displayname`
    pub display_name: Option<String>,
    /// `x-ves-cli-domain`
    pub cli_domain: Option<String>,
    /// Allowed literal values
    pub enum_values: Vec<Value>,
    pub default: Option<Value>,
    /// `x-ves-example`, always as text
    pub example: Option<String>,
    /// `x-ves-required`
    pub required_hint: bool,
}

impl Schema {
    /// Create a schema from a node with no metadata
    pub fn new(node: SchemaNode) -> Self {
        Self {
            node,
            ..Self::default()
        }
    }

    /// Target schema name of a `$ref` node
    pub fn ref_name(&self) -> Option<&str> {
        match &self.node {
            SchemaNode::Ref(reference) => reference.strip_prefix(SCHEMA_REF_PREFIX),
            _ => None,
        }
    }

    /// Object parts, if this node is an object
    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match &self.node {
            SchemaNode::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Whether this node is a string, integer, number or boolean
    pub fn is_primitive(&self) -> bool {
        matches!(
            self.node,
            SchemaNode::String | SchemaNode::Integer | SchemaNode::Number | SchemaNode::Boolean
        )
    }
}

/// Parsed OpenAPI specification
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spec {
    /// Declared `openapi` version, if any
    pub openapi: Option<String>,
    /// API title
    pub title: String,
    /// API description
    pub description: Option<String>,
    /// API version
    pub version: String,
    /// `components.schemas`, sorted by name
    pub schemas: BTreeMap<String, Schema>,
}

impl Spec {
    /// Look up a schema by name
    pub fn get_schema(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Resolve a `#/components/schemas/<Name>` reference
    pub fn resolve_ref(&self, reference: &str) -> Option<&Schema> {
        RefResolver::new(&self.schemas)
            .resolve(reference)
            .map(|(_, schema)| schema)
    }

    /// All schema names in sorted order
    pub fn schema_names(&self) -> Vec<&str> {
        self.schemas.keys().map(String::as_str).collect()
    }

    /// Find the CreateRequest schema for a resource type
    pub fn find_create_request_schema(&self, resource_name: &str) -> Option<&Schema> {
        self.find_resource_schema(resource_name, CREATE_REQUEST_SUFFIX)
    }

    /// Find the CreateSpecType schema for a resource type
    pub fn find_create_spec_type_schema(&self, resource_name: &str) -> Option<&Schema> {
        self.find_resource_schema(resource_name, CREATE_SPEC_TYPE_SUFFIX)
    }

    fn find_resource_schema(&self, resource_name: &str, suffix: &str) -> Option<&Schema> {
        naming::schema_name_candidates(resource_name, suffix)
            .iter()
            .find_map(|candidate| {
                self.schemas
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(candidate))
                    .map(|(_, schema)| schema)
            })
    }

    /// Discover every resource declared by this spec
    ///
    /// Returns canonical resource name -> (schema name, CreateRequest schema).
    /// Within one spec the first schema name in sorted order claims a name.
    pub fn find_all_resource_schemas(&self) -> BTreeMap<String, (&str, &Schema)> {
        let mut resources = BTreeMap::new();

        for (schema_name, schema) in &self.schemas {
            if !schema_name.ends_with(CREATE_REQUEST_SUFFIX) {
                continue;
            }
            if let Some(resource_name) = naming::extract_resource_name(schema_name) {
                resources
                    .entry(resource_name)
                    .or_insert((schema_name.as_str(), schema));
            }
        }

        resources
    }
}

// --- Raw OpenAPI 3.x structures for parsing ---

/// Raw OpenAPI document structure, reduced to what the engine reads
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOpenApiSpec {
    #[serde(default)]
    pub openapi: Option<String>,
    /// Set by Swagger 2.0 documents, which are not supported
    #[serde(default)]
    pub swagger: Option<String>,
    #[serde(default)]
    pub info: RawInfo,
    #[serde(default)]
    pub components: Option<RawComponents>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawInfo {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawComponents {
    #[serde(default)]
    pub schemas: IndexMap<String, RawSchema>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSchema {
    /// A string, or a list of strings in 3.1 style documents
    #[serde(rename = "type")]
    pub schema_type: Option<Value>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub format: Option<String>,
    #[serde(default)]
    pub properties: IndexMap<String, RawSchema>,
    pub items: Option<Box<RawSchema>>,
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(rename = "enum", default)]
    pub enum_values: Vec<Value>,
    pub default: Option<Value>,
    #[serde(rename = "x-ves-example")]
    pub example: Option<Value>,
    #[serde(rename = "x-ves-required")]
    pub required_hint: Option<Value>,
    #[serde(rename = "x-displayname")]
    pub display_name: Option<String>,
    #[serde(rename = "x-ves-cli-domain")]
    pub cli_domain: Option<String>,
    #[serde(rename = "x-ves-minimum-configuration")]
    pub minimum_configuration: Option<RawMinimumConfiguration>,
    /// Everything else, including `x-ves-oneof-field-*` keys
    #[serde(flatten)]
    pub extensions: IndexMap<String, Value>,
}

/// `x-ves-minimum-configuration` extension
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMinimumConfiguration {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub required_fields: Vec<String>,
    #[serde(default)]
    pub mutually_exclusive_groups: Vec<RawMutuallyExclusiveGroup>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMutuallyExclusiveGroup {
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string_schema() -> Schema {
        Schema::new(SchemaNode::String)
    }

    fn spec_with(names: &[&str]) -> Spec {
        let mut spec = Spec::default();
        for name in names {
            spec.schemas.insert(name.to_string(), string_schema());
        }
        spec
    }

    #[test]
    fn test_ref_name() {
        let schema = Schema::new(SchemaNode::Ref("#/components/schemas/Pool".to_string()));
        assert_eq!(schema.ref_name(), Some("Pool"));

        let external = Schema::new(SchemaNode::Ref("other.json#/Pool".to_string()));
        assert_eq!(external.ref_name(), None);
    }

    #[test]
    fn test_is_required_uses_hint() {
        let mut object = ObjectSchema::default();
        object.required.insert("name".to_string());
        let mut hinted = string_schema();
        hinted.required_hint = true;
        object.properties.insert("port".to_string(), hinted);
        object.properties.insert("labels".to_string(), string_schema());

        assert!(object.is_required("name"));
        assert!(object.is_required("port"));
        assert!(!object.is_required("labels"));
    }

    #[test]
    fn test_find_create_request_schema_variants() {
        let spec = spec_with(&[
            "viewshttp_loadbalancerCreateRequest",
            "viewsoriginpoolCreateRequest",
            "viewsoriginpoolCreateSpecType",
        ]);

        assert!(spec.find_create_request_schema("http_loadbalancer").is_some());
        assert!(spec.find_create_request_schema("HTTP_LoadBalancer").is_some());
        assert!(spec.find_create_request_schema("origin_pool").is_some());
        assert!(spec.find_create_spec_type_schema("origin_pool").is_some());
        assert!(spec.find_create_spec_type_schema("http_loadbalancer").is_none());
        assert!(spec.find_create_request_schema("dns_zone").is_none());
    }

    #[test]
    fn test_find_all_resource_schemas() {
        let spec = spec_with(&[
            "viewshttploadbalancerCreateRequest",
            "publicDnsZoneCreateRequest",
            "viewsCreateRequest",
            "viewshttploadbalancerGetResponse",
        ]);

        let resources = spec.find_all_resource_schemas();
        let names: Vec<&str> = resources.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["dns_zone", "httploadbalancer"]);
        assert_eq!(
            resources["httploadbalancer"].0,
            "viewshttploadbalancerCreateRequest"
        );
    }
}
