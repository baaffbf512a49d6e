//! `$ref` resolution and cycle tracking for schema traversal

use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

use crate::types::{Schema, SCHEMA_REF_PREFIX};

/// Resolves `#/components/schemas/<Name>` references against one spec
pub struct RefResolver<'a> {
    /// Component schemas from the OpenAPI spec
    schemas: &'a BTreeMap<String, Schema>,
}

impl<'a> RefResolver<'a> {
    /// Create a new resolver with the given component schemas
    pub fn new(schemas: &'a BTreeMap<String, Schema>) -> Self {
        Self { schemas }
    }

    /// Resolve a reference to its schema name and schema
    ///
    /// External or malformed references resolve to `None`.
    pub fn resolve(&self, reference: &str) -> Option<(&'a str, &'a Schema)> {
        let name = reference.strip_prefix(SCHEMA_REF_PREFIX)?;
        self.schemas
            .get_key_value(name)
            .map(|(name, schema)| (name.as_str(), schema))
    }
}

/// Schema names currently being expanded by one synthesis call
#[derive(Debug, Default)]
pub struct VisitStack {
    names: Vec<String>,
}

impl VisitStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` is already being expanded further up the call chain
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|visited| visited == name)
    }

    pub fn depth(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Push `name` and return a guard that pops it when dropped
    ///
    /// Returns `None` if `name` is already on the stack.
    pub fn enter(&mut self, name: &str) -> Option<VisitGuard<'_>> {
        if self.contains(name) {
            return None;
        }
        self.names.push(name.to_string());
        Some(VisitGuard { stack: self })
    }
}

/// Keeps a schema name on the [`VisitStack`] for the guard's lifetime
pub struct VisitGuard<'s> {
    stack: &'s mut VisitStack,
}

impl Deref for VisitGuard<'_> {
    type Target = VisitStack;

    fn deref(&self) -> &VisitStack {
        self.stack
    }
}

impl DerefMut for VisitGuard<'_> {
    fn deref_mut(&mut self) -> &mut VisitStack {
        self.stack
    }
}

impl Drop for VisitGuard<'_> {
    fn drop(&mut self) {
        self.stack.names.pop();
    }
}
