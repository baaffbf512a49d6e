//! Resource name normalization
//!
//! Canonical resource names are snake_case and derived from the name of the
//! resource's CreateRequest schema.

use std::path::Path;

use crate::types::{CREATE_REQUEST_SUFFIX, SCHEMA_NAME_PREFIXES};

/// Spec files whose names start with this prefix are not domain files
const NON_DOMAIN_FILE_PREFIX: &str = "docs-cloud-f5-com";

/// Convert a CreateRequest schema name into a canonical resource name
///
/// `viewshttploadbalancerCreateRequest` -> `httploadbalancer`,
/// `publicDnsZoneCreateRequest` -> `dns_zone`.
pub fn extract_resource_name(schema_name: &str) -> Option<String> {
    let name = schema_name
        .strip_suffix(CREATE_REQUEST_SUFFIX)
        .unwrap_or(schema_name);

    let name = SCHEMA_NAME_PREFIXES
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix))
        .unwrap_or(name);

    if name.is_empty() {
        return None;
    }

    Some(camel_to_snake(name))
}

/// Convert camelCase or PascalCase to snake_case
pub fn camel_to_snake(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);

    for (index, c) in name.chars().enumerate() {
        if c.is_uppercase() && index > 0 && !result.ends_with('_') {
            result.push('_');
        }
        result.extend(c.to_lowercase());
    }

    result
}

/// Key used for fuzzy comparison: lowercase with every underscore removed
pub fn fuzzy_key(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Whether two resource names match ignoring case and underscores
///
/// `http_loadbalancer` matches `httploadbalancer` and `HttpLoadBalancer`.
pub fn fuzzy_match_resource_name(query: &str, target: &str) -> bool {
    query.eq_ignore_ascii_case(target) || fuzzy_key(query) == fuzzy_key(target)
}

/// Schema names that may hold `<resource><suffix>`, in lookup order
pub fn schema_name_candidates(resource_name: &str, suffix: &str) -> Vec<String> {
    let compact = resource_name.replace('_', "");
    let mut forms = vec![resource_name.to_string()];
    if compact != resource_name {
        forms.push(compact);
    }

    let mut candidates = Vec::with_capacity(forms.len() * (SCHEMA_NAME_PREFIXES.len() + 1));
    for form in &forms {
        candidates.push(format!("{}{}", form, suffix));
        for prefix in SCHEMA_NAME_PREFIXES {
            candidates.push(format!("{}{}{}", prefix, form, suffix));
        }
    }

    candidates
}

/// Domain name of a spec file: `load_balancer.json` -> `load_balancer`
pub fn extract_domain_from_file(path: impl AsRef<Path>) -> Option<String> {
    let basename = path.as_ref().file_name()?.to_str()?;

    if basename.starts_with(NON_DOMAIN_FILE_PREFIX) {
        return None;
    }

    basename
        .strip_suffix(".json")
        .filter(|domain| !domain.is_empty())
        .map(str::to_string)
}
