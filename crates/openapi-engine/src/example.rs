//! Example payload synthesis from OpenAPI schemas
//!
//! Produces a small, representative JSON value for a schema: required and
//! documented fields plus a short allow-list of commonly useful ones, one item
//! per array, and at most one member of each mutually exclusive group.
//! Recursion is bounded by a depth limit and by a per-call visit stack that
//! stops `$ref` cycles.

use serde_json::{json, Map, Number, Value};
use std::collections::{BTreeMap, BTreeSet};

use crate::resolver::{RefResolver, VisitStack};
use crate::types::{ObjectSchema, Schema, SchemaNode, Spec};

/// Default nesting limit for synthesized objects
pub const DEFAULT_MAX_DEPTH: usize = 2;

/// Fields that never appear in examples
const INTERNAL_FIELDS: &[&str] = &["gc_spec"];

/// Fields with this prefix never appear in examples
const DISABLED_FIELD_PREFIX: &str = "disable_";

/// Fields included whenever a schema has them
const COMMON_FIELDS: &[&str] = &[
    // Identifiers
    "name",
    "namespace",
    "tenant",
    // Networking
    "domains",
    "http",
    "https",
    "port",
    "ports",
    // Load balancing
    "origin_servers",
    "origin_pool",
    "default_route_pools",
    "default_pool",
    "weight",
    "priority",
    // Security
    "app_firewall",
    "waf_exclusion_rules",
    // TLS
    "tls_config",
    "use_tls",
];

/// Generates example JSON from the schemas of one spec
pub struct ExampleGenerator<'a> {
    spec: &'a Spec,
    resolver: RefResolver<'a>,
    max_depth: usize,
}

impl<'a> ExampleGenerator<'a> {
    /// Create a new example generator for the given spec
    pub fn new(spec: &'a Spec) -> Self {
        Self {
            spec,
            resolver: RefResolver::new(&spec.schemas),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Override the nesting limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Synthesize an example for `schema`
    ///
    /// Returns `None` when nothing worth showing remains after field selection
    /// and cleanup. Each call starts with an empty visit stack.
    pub fn synthesize(&self, schema: &Schema) -> Option<Value> {
        let mut visited = VisitStack::new();
        self.generate(schema, None, 0, &mut visited)
            .and_then(cleanup_example)
    }

    /// Synthesize an example for a named schema of this spec
    pub fn synthesize_named(&self, schema_name: &str) -> Option<Value> {
        self.synthesize(self.spec.get_schema(schema_name)?)
    }

    /// Example of a resource's CreateRequest schema
    pub fn generate_example(&self, resource_name: &str) -> Option<Value> {
        self.synthesize(self.spec.find_create_request_schema(resource_name)?)
    }

    /// Complete create request scaffold: generated metadata plus a spec body
    /// synthesized from the resource's CreateSpecType schema
    ///
    /// Returns `None` when the spec has no CreateSpecType schema for the
    /// resource; [`generate_example`](Self::generate_example) covers those.
    pub fn generate_create_request_example(&self, resource_name: &str) -> Option<Value> {
        let spec_schema = self.spec.find_create_spec_type_schema(resource_name)?;

        let spec_example = self
            .synthesize(spec_schema)
            .unwrap_or_else(|| Value::Object(Map::new()));

        Some(json!({
            "metadata": Self::generate_metadata_example(resource_name),
            "spec": spec_example,
        }))
    }

    /// Metadata block for a create request
    pub fn generate_metadata_example(resource_name: &str) -> Value {
        json!({
            "name": format!("example-{}", resource_name.replace('_', "-")),
            "namespace": "example-namespace",
        })
    }

    /// Generate a value for one schema node
    ///
    /// `field` is the property name the node sits under, used as a hint for
    /// placeholder values.
    fn generate(
        &self,
        schema: &Schema,
        field: Option<&str>,
        depth: usize,
        visited: &mut VisitStack,
    ) -> Option<Value> {
        if depth > self.max_depth {
            return None;
        }

        match &schema.node {
            SchemaNode::Ref(reference) => {
                let (name, target) = self.resolver.resolve(reference)?;
                let mut guard = visited.enter(name)?;
                self.generate(target, field, depth, &mut guard)
            }
            SchemaNode::Object(object) => self.generate_object(object, depth, visited),
            SchemaNode::Array(items) => {
                self.generate_array(items.as_deref()?, field, depth, visited)
            }
            SchemaNode::String => Some(Value::String(generate_string(schema, field))),
            SchemaNode::Integer | SchemaNode::Number => Some(generate_number(schema, field)),
            SchemaNode::Boolean => Some(Value::Bool(generate_boolean(schema))),
            SchemaNode::Unset => None,
        }
    }

    fn generate_object(
        &self,
        object: &ObjectSchema,
        depth: usize,
        visited: &mut VisitStack,
    ) -> Option<Value> {
        let mut result = Map::new();

        for name in select_fields_to_include(object) {
            let Some(prop) = object.properties.get(name) else {
                continue;
            };
            match self.generate(prop, Some(name), depth + 1, visited) {
                Some(value) if !is_empty_value(&value) => {
                    result.insert(name.to_string(), value);
                }
                _ => {}
            }
        }

        if result.is_empty() {
            None
        } else {
            Some(Value::Object(result))
        }
    }

    /// One representative item; the item shares the array field's depth
    fn generate_array(
        &self,
        items: &Schema,
        field: Option<&str>,
        depth: usize,
        visited: &mut VisitStack,
    ) -> Option<Value> {
        let item = self.generate(items, field, depth, visited)?;
        if is_empty_value(&item) {
            return None;
        }
        Some(Value::Array(vec![item]))
    }
}

/// Decide which properties of an object appear in its example, sorted by name
fn select_fields_to_include(object: &ObjectSchema) -> BTreeSet<&str> {
    let mut fields = BTreeSet::new();

    for (name, prop) in &object.properties {
        if name.starts_with(DISABLED_FIELD_PREFIX) || INTERNAL_FIELDS.contains(&name.as_str()) {
            continue;
        }

        let has_literal_hint =
            prop.is_primitive() && (prop.default.is_some() || !prop.enum_values.is_empty());

        if object.is_required(name)
            || prop.example.is_some()
            || has_literal_hint
            || COMMON_FIELDS.contains(&name.as_str())
        {
            fields.insert(name.as_str());
        }
    }

    prune_one_of_groups(&mut fields, &object.one_of_groups);
    fields
}

/// Keep only the first declared member of each mutually exclusive group
fn prune_one_of_groups(fields: &mut BTreeSet<&str>, groups: &BTreeMap<String, Vec<String>>) {
    for options in groups.values() {
        let mut found_first = false;
        for option in options {
            if fields.contains(option.as_str()) {
                if found_first {
                    fields.remove(option.as_str());
                } else {
                    found_first = true;
                }
            }
        }
    }
}

/// Lowercased text used to pick placeholder values
struct Hints {
    field: String,
    title: String,
    description: String,
}

impl Hints {
    fn new(schema: &Schema, field: Option<&str>) -> Self {
        Self {
            field: field.unwrap_or_default().to_lowercase(),
            title: schema.title.as_deref().unwrap_or_default().to_lowercase(),
            description: schema.description.as_deref().unwrap_or_default().to_lowercase(),
        }
    }

    /// Whether the field name or title mentions `keyword`
    fn names(&self, keyword: &str) -> bool {
        self.field.contains(keyword) || self.title.contains(keyword)
    }

    fn describes(&self, phrase: &str) -> bool {
        self.description.contains(phrase)
    }
}

fn generate_string(schema: &Schema, field: Option<&str>) -> String {
    if let Some(example) = &schema.example {
        return example.clone();
    }
    if let Some(Value::String(default)) = &schema.default {
        return default.clone();
    }
    if let Some(first) = schema.enum_values.first().and_then(Value::as_str) {
        return first.to_string();
    }

    let hints = Hints::new(schema, field);
    // Field name and title decide before the description does. "namespace"
    // contains "name", so it is checked first.
    let placeholder = if hints.names("namespace") {
        "example-namespace"
    } else if hints.names("domain") {
        "www.example.com"
    } else if hints.names("name") {
        "example-resource"
    } else if hints.describes("namespace") {
        "example-namespace"
    } else if hints.describes("domain") {
        "www.example.com"
    } else if hints.describes("name of") {
        "example-resource"
    } else {
        "example-value"
    };
    placeholder.to_string()
}

fn generate_number(schema: &Schema, field: Option<&str>) -> Value {
    if let Some(example) = &schema.example {
        let example = example.trim();
        if let Ok(int) = example.parse::<i64>() {
            return Value::from(int);
        }
        if let Some(number) = example.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(number);
        }
    }

    if let Some(default) = &schema.default {
        return default.clone();
    }

    let hints = Hints::new(schema, field);
    if hints.names("port") {
        Value::from(80)
    } else {
        // weight, priority and everything else
        Value::from(1)
    }
}

fn generate_boolean(schema: &Schema) -> bool {
    matches!(schema.default, Some(Value::Bool(true)))
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Remove nulls, and arrays or objects that are or become empty
///
/// Returns `None` when nothing is left.
pub fn cleanup_example(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Object(map) => {
            let cleaned: Map<String, Value> = map
                .into_iter()
                .filter_map(|(key, value)| cleanup_example(value).map(|value| (key, value)))
                .collect();
            if cleaned.is_empty() {
                None
            } else {
                Some(Value::Object(cleaned))
            }
        }
        Value::Array(items) => {
            let cleaned: Vec<Value> = items.into_iter().filter_map(cleanup_example).collect();
            if cleaned.is_empty() {
                None
            } else {
                Some(Value::Array(cleaned))
            }
        }
        other => Some(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::OpenApiParser;

    fn spec(schemas: Value) -> Spec {
        let document = json!({
            "openapi": "3.0.3",
            "info": {"title": "test", "version": "1"},
            "components": {"schemas": schemas},
        });
        OpenApiParser::parse_json(&document.to_string()).unwrap()
    }

    fn example(spec: &Spec, name: &str) -> Option<Value> {
        ExampleGenerator::new(spec).synthesize_named(name)
    }

    #[test]
    fn test_required_and_default_fields() {
        let spec = spec(json!({
            "fooCreateRequest": {
                "type": "object",
                "required": ["name"],
                "properties": {
                    "name": {"type": "string"},
                    "port": {"type": "integer", "default": 80},
                    "description": {"type": "string"}
                }
            }
        }));

        assert_eq!(
            example(&spec, "fooCreateRequest"),
            Some(json!({"name": "example-resource", "port": 80}))
        );
    }

    #[test]
    fn test_excluded_fields_win_over_inclusion_rules() {
        let spec = spec(json!({
            "Site": {
                "type": "object",
                "required": ["disable_forwarding", "gc_spec"],
                "properties": {
                    "disable_forwarding": {"type": "boolean", "default": true},
                    "gc_spec": {"type": "string", "x-ves-example": "internal"},
                    "name": {"type": "string"}
                }
            }
        }));

        assert_eq!(example(&spec, "Site"), Some(json!({"name": "example-resource"})));
    }

    #[test]
    fn test_example_hint_and_enum_fields() {
        let spec = spec(json!({
            "Pool": {
                "type": "object",
                "properties": {
                    "algorithm": {"type": "string", "enum": ["ROUND_ROBIN", "LEAST_ACTIVE"]},
                    "timeout": {"type": "integer", "x-ves-example": "3000"},
                    "ratio": {"type": "number", "x-ves-example": "0.5"},
                    "healthcheck": {"type": "string", "x-ves-example": "hc-1"},
                    "labels": {"type": "object", "properties": {"env": {"type": "string"}}},
                    "verbose": {"type": "boolean"}
                }
            }
        }));

        assert_eq!(
            example(&spec, "Pool"),
            Some(json!({
                "algorithm": "ROUND_ROBIN",
                "healthcheck": "hc-1",
                "ratio": 0.5,
                "timeout": 3000
            }))
        );
    }

    #[test]
    fn test_one_of_keeps_first_declared() {
        let spec = spec(json!({
            "Lb": {
                "type": "object",
                "x-ves-oneof-field-loadbalancer_type": "[\"https\",\"http\"]",
                "properties": {
                    "http": {"type": "object", "x-ves-required": "true",
                             "properties": {"port": {"type": "integer"}}},
                    "https": {"type": "object", "x-ves-required": "true",
                              "properties": {"port": {"type": "integer", "default": 443}}}
                }
            }
        }));

        assert_eq!(example(&spec, "Lb"), Some(json!({"https": {"port": 443}})));
    }

    #[test]
    fn test_one_of_skips_members_that_were_not_selected() {
        let spec = spec(json!({
            "Lb": {
                "type": "object",
                "x-ves-oneof-field-choice": "[\"advertise_custom\",\"http\",\"https\"]",
                "properties": {
                    "advertise_custom": {"type": "object", "properties": {"x": {"type": "string"}}},
                    "http": {"type": "object", "properties": {"port": {"type": "integer"}}},
                    "https": {"type": "object", "properties": {"port": {"type": "integer"}}}
                }
            }
        }));

        assert_eq!(example(&spec, "Lb"), Some(json!({"http": {"port": 80}})));
    }

    #[test]
    fn test_direct_self_reference_terminates() {
        let spec = spec(json!({
            "Policy": {
                "type": "object",
                "required": ["name", "parent"],
                "properties": {
                    "name": {"type": "string"},
                    "parent": {"$ref": "#/components/schemas/Policy"}
                }
            }
        }));

        let value = example(&spec, "Policy").unwrap();
        assert_eq!(value["parent"]["name"], "example-resource");
        assert!(value["parent"].get("parent").is_none());
    }

    #[test]
    fn test_mutual_recursion_terminates_at_any_depth() {
        let spec = spec(json!({
            "A": {"type": "object", "required": ["b", "id"],
                  "properties": {"id": {"type": "string"}, "b": {"$ref": "#/components/schemas/B"}}},
            "B": {"type": "object", "required": ["a", "id"],
                  "properties": {"id": {"type": "string"}, "a": {"$ref": "#/components/schemas/A"}}}
        }));

        let generator = ExampleGenerator::new(&spec).with_max_depth(50);
        let value = generator.synthesize_named("A").unwrap();

        assert_eq!(value["b"]["a"]["id"], "example-value");
        assert!(value["b"]["a"].get("b").is_none());
    }

    #[test]
    fn test_depth_limit_drops_deep_fields() {
        let spec = spec(json!({
            "A": {"type": "object", "required": ["b", "tag"],
                  "properties": {"tag": {"type": "string"}, "b": {"$ref": "#/components/schemas/B"}}},
            "B": {"type": "object", "required": ["c", "tag"],
                  "properties": {"tag": {"type": "string"}, "c": {"$ref": "#/components/schemas/C"}}},
            "C": {"type": "object", "required": ["d", "tag"],
                  "properties": {"tag": {"type": "string"}, "d": {"$ref": "#/components/schemas/D"}}},
            "D": {"type": "object", "required": ["tag"],
                  "properties": {"tag": {"type": "string"}}}
        }));

        let value = example(&spec, "A").unwrap();
        assert_eq!(
            value,
            json!({"b": {"tag": "example-value"}, "tag": "example-value"})
        );

        let deeper = ExampleGenerator::new(&spec)
            .with_max_depth(3)
            .synthesize_named("A")
            .unwrap();
        assert_eq!(deeper["b"]["c"]["tag"], "example-value");
        assert!(deeper["b"]["c"].get("d").is_none());
    }

    #[test]
    fn test_recursive_array_keeps_one_level() {
        let spec = spec(json!({
            "Node": {
                "type": "object",
                "required": ["children", "name"],
                "properties": {
                    "name": {"type": "string"},
                    "children": {"type": "array", "items": {"$ref": "#/components/schemas/Node"}}
                }
            }
        }));

        assert_eq!(
            example(&spec, "Node"),
            Some(json!({
                "children": [{"name": "example-resource"}],
                "name": "example-resource"
            }))
        );
    }

    #[test]
    fn test_array_of_empty_objects_is_absent() {
        let spec = spec(json!({
            "Lb": {
                "type": "object",
                "required": ["routes", "domains"],
                "properties": {
                    "routes": {"type": "array", "items": {"type": "object",
                               "properties": {"comment": {"type": "string"}}}},
                    "domains": {"type": "array", "items": {"type": "string"}},
                    "tags": {"type": "array"}
                }
            }
        }));

        assert_eq!(example(&spec, "Lb"), Some(json!({"domains": ["www.example.com"]})));
    }

    #[test]
    fn test_only_empty_fields_is_absent() {
        let spec = spec(json!({
            "Empty": {
                "type": "object",
                "required": ["spec", "list", "ghost"],
                "properties": {
                    "spec": {"type": "object"},
                    "list": {"type": "array", "items": {"type": "object"}},
                    "ghost": {"$ref": "#/components/schemas/Missing"}
                }
            }
        }));

        assert_eq!(example(&spec, "Empty"), None);
    }

    #[test]
    fn test_string_placeholders() {
        let spec = spec(json!({
            "Meta": {
                "type": "object",
                "required": ["namespace", "host", "label", "title_only", "described"],
                "properties": {
                    "namespace": {"type": "string"},
                    "host": {"type": "string", "description": "Domain served by the site"},
                    "label": {"type": "string"},
                    "title_only": {"type": "string", "title": "Display name"},
                    "described": {"type": "string", "description": "Name of the pool"}
                }
            }
        }));

        assert_eq!(
            example(&spec, "Meta"),
            Some(json!({
                "described": "example-resource",
                "host": "www.example.com",
                "label": "example-value",
                "namespace": "example-namespace",
                "title_only": "example-resource"
            }))
        );
    }

    #[test]
    fn test_name_field_ignores_namespace_in_description() {
        let spec = spec(json!({
            "viewsfooCreateRequest": {
                "type": "object",
                "required": ["metadata"],
                "properties": {"metadata": {"$ref": "#/components/schemas/schemaObjectCreateMetaType"}}
            },
            "schemaObjectCreateMetaType": {
                "type": "object",
                "required": ["name", "zone"],
                "properties": {
                    "name": {
                        "type": "string",
                        "title": "name",
                        "description": "This is the name of configuration object. It has to be unique within the namespace."
                    },
                    "zone": {"type": "string", "description": "Zone name, unique within the domain"}
                }
            }
        }));

        assert_eq!(
            example(&spec, "viewsfooCreateRequest"),
            Some(json!({"metadata": {"name": "example-resource", "zone": "www.example.com"}}))
        );
    }

    #[test]
    fn test_number_and_boolean_defaults() {
        let spec = spec(json!({
            "Origin": {
                "type": "object",
                "required": ["listen_port", "weight", "retries", "enabled", "strict", "bad_example"],
                "properties": {
                    "listen_port": {"type": "integer"},
                    "weight": {"type": "integer"},
                    "retries": {"type": "integer"},
                    "enabled": {"type": "boolean", "default": true},
                    "strict": {"type": "boolean"},
                    "bad_example": {"type": "integer", "x-ves-example": "lots", "default": 7}
                }
            }
        }));

        assert_eq!(
            example(&spec, "Origin"),
            Some(json!({
                "bad_example": 7,
                "enabled": true,
                "listen_port": 80,
                "retries": 1,
                "strict": false,
                "weight": 1
            }))
        );
    }

    #[test]
    fn test_synthesis_is_repeatable() {
        let spec = spec(json!({
            "Node": {
                "type": "object",
                "x-ves-oneof-field-mode": "[\"a\",\"b\"]",
                "required": ["a", "b", "self", "name"],
                "properties": {
                    "name": {"type": "string"},
                    "a": {"type": "string"},
                    "b": {"type": "string"},
                    "self": {"$ref": "#/components/schemas/Node"}
                }
            }
        }));

        let generator = ExampleGenerator::new(&spec);
        let first = serde_json::to_string_pretty(&generator.synthesize_named("Node")).unwrap();
        let second = serde_json::to_string_pretty(&generator.synthesize_named("Node")).unwrap();

        assert_eq!(first, second);
        assert!(!first.contains("\"b\""));
    }

    #[test]
    fn test_create_request_scaffold() {
        let spec = spec(json!({
            "viewsorigin_poolCreateSpecType": {
                "type": "object",
                "properties": {
                    "origin_servers": {"type": "array", "items": {"$ref": "#/components/schemas/Server"}},
                    "port": {"type": "integer", "x-ves-example": "8080"},
                    "disable_tls": {"type": "boolean", "default": false}
                }
            },
            "Server": {
                "type": "object",
                "properties": {"public_name": {"type": "string", "x-ves-example": "origin.example.com"}}
            }
        }));

        let generator = ExampleGenerator::new(&spec);
        assert_eq!(
            generator.generate_create_request_example("origin_pool"),
            Some(json!({
                "metadata": {"name": "example-origin-pool", "namespace": "example-namespace"},
                "spec": {
                    "origin_servers": [{"public_name": "origin.example.com"}],
                    "port": 8080
                }
            }))
        );
        assert_eq!(generator.generate_create_request_example("dns_zone"), None);
    }

    #[test]
    fn test_create_request_needs_spec_type_schema() {
        let spec = spec(json!({
            "viewsdns_zoneCreateRequest": {
                "type": "object",
                "required": ["name"],
                "properties": {"name": {"type": "string"}}
            }
        }));

        let generator = ExampleGenerator::new(&spec);
        assert_eq!(generator.generate_create_request_example("dns_zone"), None);
        assert_eq!(
            generator.generate_example("dns_zone"),
            Some(json!({"name": "example-resource"}))
        );
    }

    #[test]
    fn test_create_request_with_empty_spec_body() {
        let spec = spec(json!({
            "viewsbucketCreateSpecType": {"type": "object", "properties": {"notes": {"type": "string"}}}
        }));

        let value = ExampleGenerator::new(&spec)
            .generate_create_request_example("bucket")
            .unwrap();
        assert_eq!(value["spec"], json!({}));
        assert_eq!(value["metadata"]["name"], "example-bucket");
    }

    #[test]
    fn test_cleanup_example() {
        let cleaned = cleanup_example(json!({
            "keep": 1,
            "null": null,
            "nested": {"inner": null, "list": [null, {}]},
            "list": [{"a": null}, "x"]
        }));

        assert_eq!(cleaned, Some(json!({"keep": 1, "list": ["x"]})));
        assert_eq!(cleanup_example(json!({"a": {"b": []}})), None);
        assert_eq!(cleanup_example(json!(false)), Some(json!(false)));
    }
}
