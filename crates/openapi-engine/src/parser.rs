//! Main OpenAPI parser

use crate::error::{ParseError, ParseResult};
use crate::types::*;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Vendor key prefix carrying one mutually exclusive field group
const ONE_OF_FIELD_PREFIX: &str = "x-ves-oneof-field-";

/// Group key prefix for groups taken from `x-ves-minimum-configuration`
const MINIMUM_CONFIG_GROUP_PREFIX: &str = "minimum_config_";

/// OpenAPI 3.x parser
pub struct OpenApiParser;

impl OpenApiParser {
    /// Parse an OpenAPI spec from a string (auto-detects JSON/YAML)
    pub fn parse(content: &str) -> ParseResult<Spec> {
        let raw_spec: RawOpenApiSpec = if content.trim_start().starts_with('{') {
            serde_json::from_str(content)?
        } else {
            serde_yaml::from_str(content)?
        };

        Self::convert_spec(raw_spec)
    }

    /// Parse an OpenAPI spec from JSON
    pub fn parse_json(content: &str) -> ParseResult<Spec> {
        let raw_spec: RawOpenApiSpec = serde_json::from_str(content)?;
        Self::convert_spec(raw_spec)
    }

    /// Parse an OpenAPI spec from YAML
    pub fn parse_yaml(content: &str) -> ParseResult<Spec> {
        let raw_spec: RawOpenApiSpec = serde_yaml::from_str(content)?;
        Self::convert_spec(raw_spec)
    }

    /// Read and parse a spec file, choosing the format from its extension
    pub fn parse_file(path: impl AsRef<Path>) -> ParseResult<Spec> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&content),
            Some("yaml") | Some("yml") => Self::parse_yaml(&content),
            _ => Self::parse(&content),
        }
    }

    /// Convert a raw OpenAPI spec to our internal format
    fn convert_spec(raw: RawOpenApiSpec) -> ParseResult<Spec> {
        if let Some(version) = &raw.swagger {
            return Err(ParseError::UnsupportedVersion(version.clone()));
        }
        if let Some(version) = &raw.openapi {
            if !version.starts_with("3.") {
                return Err(ParseError::UnsupportedVersion(version.clone()));
            }
        }

        debug!(
            "Parsing OpenAPI {} spec: {}",
            raw.openapi.as_deref().unwrap_or("(unversioned)"),
            raw.info.title
        );

        let schemas: BTreeMap<String, Schema> = raw
            .components
            .map(|components| components.schemas)
            .unwrap_or_default()
            .into_iter()
            .map(|(name, schema)| (name, Self::convert_schema(schema)))
            .collect();

        debug!("Converted {} schemas", schemas.len());

        Ok(Spec {
            openapi: raw.openapi,
            title: raw.info.title,
            description: raw.info.description,
            version: raw.info.version,
            schemas,
        })
    }

    /// Convert one raw schema node, recursing into properties and items
    fn convert_schema(raw: RawSchema) -> Schema {
        let required_hint = raw.required_hint.as_ref().map(Self::is_truthy).unwrap_or(false);
        let example = raw.example.as_ref().and_then(Self::example_text);
        let schema_type = Self::schema_type(raw.schema_type.as_ref()).map(str::to_string);

        let node = match (raw.reference, schema_type.as_deref()) {
            (Some(reference), _) => SchemaNode::Ref(reference),
            (None, Some("array")) => {
                SchemaNode::Array(raw.items.map(|items| Box::new(Self::convert_schema(*items))))
            }
            (None, Some("string")) => SchemaNode::String,
            (None, Some("integer")) => SchemaNode::Integer,
            (None, Some("number")) => SchemaNode::Number,
            (None, Some("boolean")) => SchemaNode::Boolean,
            (None, Some("object")) => SchemaNode::Object(Self::convert_object(
                raw.properties,
                raw.required,
                &raw.extensions,
                raw.minimum_configuration.as_ref(),
            )),
            (None, _) if !raw.properties.is_empty() => SchemaNode::Object(Self::convert_object(
                raw.properties,
                raw.required,
                &raw.extensions,
                raw.minimum_configuration.as_ref(),
            )),
            (None, _) => SchemaNode::Unset,
        };

        Schema {
            node,
            title: raw.title,
            description: raw.description,
            format: raw.format,
            display_name: raw.display_name,
            cli_domain: raw.cli_domain,
            enum_values: raw.enum_values,
            default: raw.default,
            example,
            required_hint,
        }
    }

    fn convert_object(
        properties: indexmap::IndexMap<String, RawSchema>,
        required: Vec<String>,
        extensions: &indexmap::IndexMap<String, Value>,
        minimum_configuration: Option<&RawMinimumConfiguration>,
    ) -> ObjectSchema {
        let properties: BTreeMap<String, Schema> = properties
            .into_iter()
            .map(|(name, prop)| (name, Self::convert_schema(prop)))
            .collect();

        let mut required: std::collections::BTreeSet<String> = required.into_iter().collect();
        let mut one_of_groups = Self::convert_one_of_groups(extensions);

        if let Some(minimum) = minimum_configuration {
            // Only plain field names apply at this level; dotted paths and
            // "a OR b" alternatives describe the whole request document.
            required.extend(
                minimum
                    .required_fields
                    .iter()
                    .filter(|field| properties.contains_key(field.as_str()))
                    .cloned(),
            );

            for (index, group) in minimum.mutually_exclusive_groups.iter().enumerate() {
                if group.fields.len() > 1 {
                    one_of_groups.insert(
                        format!("{}{}", MINIMUM_CONFIG_GROUP_PREFIX, index),
                        group.fields.clone(),
                    );
                }
            }
        }

        ObjectSchema {
            properties,
            required,
            one_of_groups,
        }
    }

    /// Extract `x-ves-oneof-field-<group>` extensions
    ///
    /// The upstream pipeline encodes the field list as a JSON string; a plain
    /// array is accepted too.
    fn convert_one_of_groups(
        extensions: &indexmap::IndexMap<String, Value>,
    ) -> BTreeMap<String, Vec<String>> {
        extensions
            .iter()
            .filter_map(|(key, value)| {
                let group = key.strip_prefix(ONE_OF_FIELD_PREFIX)?;
                let fields = match value {
                    Value::String(encoded) => match serde_json::from_str::<Vec<String>>(encoded) {
                        Ok(fields) => fields,
                        Err(e) => {
                            debug!("Ignoring malformed {}: {}", key, e);
                            return None;
                        }
                    },
                    Value::Array(items) => items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect(),
                    _ => return None,
                };
                Some((group.to_string(), fields))
            })
            .collect()
    }

    /// `type` as a single name; 3.1 style lists yield their first non-null entry
    fn schema_type(raw: Option<&Value>) -> Option<&str> {
        match raw? {
            Value::String(name) => Some(name.as_str()),
            Value::Array(names) => names
                .iter()
                .filter_map(Value::as_str)
                .find(|name| *name != "null"),
            _ => None,
        }
    }

    fn is_truthy(value: &Value) -> bool {
        match value {
            Value::Bool(flag) => *flag,
            Value::String(text) => text.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    fn example_text(value: &Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(text) if text.is_empty() => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }
}
