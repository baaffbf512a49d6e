//! # openapi-engine
//!
//! Schema index and example synthesis for xcspec.
//! Loads a directory of OpenAPI 3.x specs, maps resource names to the schema
//! that defines their create payload, and synthesizes minimal example
//! payloads from those schemas.

mod types;
mod parser;
mod resolver;
mod naming;
mod loader;
mod mapper;
mod example;
mod validation;
mod error;

pub use types::*;
pub use parser::OpenApiParser;
pub use resolver::{RefResolver, VisitGuard, VisitStack};
pub use naming::{camel_to_snake, extract_domain_from_file, extract_resource_name, fuzzy_match_resource_name};
pub use loader::{load_all_specs, LoadFailure, LoadedSpecs, INDEX_FILE};
pub use mapper::{ResourceConflict, ResourceEntry, ResourceSpecInfo, SpecMapper};
pub use example::{cleanup_example, ExampleGenerator, DEFAULT_MAX_DEPTH};
pub use validation::{
    filter_by_severity, is_valid_domain_name, validate_index, DomainSummary, IndexedSpec, Severity,
    SpecIndex, ValidationIssue, ValidationReport,
};
pub use error::{ParseError, ParseResult};
