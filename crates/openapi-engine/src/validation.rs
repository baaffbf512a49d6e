//! Spec-quality checks over the upstream spec index (`index.json`)

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::OnceLock;

/// Upstream spec index
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpecIndex {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub specifications: Vec<IndexedSpec>,
}

/// One domain entry of the spec index
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexedSpec {
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub path_count: usize,
    #[serde(default)]
    pub schema_count: usize,
}

/// How bad a validation issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A spec quality issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Domain the issue is about, or `index` for index-wide issues
    pub domain: String,
    /// Machine-readable issue code, e.g. `empty_domain`
    pub issue: String,
    pub details: String,
}

impl ValidationIssue {
    fn new(severity: Severity, domain: &str, issue: &str, details: impl Into<String>) -> Self {
        Self {
            severity,
            domain: domain.to_string(),
            issue: issue.to_string(),
            details: details.into(),
        }
    }
}

/// Path and schema counts of one domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSummary {
    pub domain: String,
    pub path_count: usize,
    pub schema_count: usize,
}

/// Machine-readable validation report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub version: String,
    pub summary: BTreeMap<String, usize>,
    pub issues: Vec<ValidationIssue>,
    /// Sorted by domain name
    pub domains: Vec<DomainSummary>,
}

impl ValidationReport {
    /// Assemble a report from an index and the issues found in it
    pub fn build(index: &SpecIndex, issues: Vec<ValidationIssue>) -> Self {
        let total_paths: usize = index.specifications.iter().map(|s| s.path_count).sum();
        let total_schemas: usize = index.specifications.iter().map(|s| s.schema_count).sum();

        let mut summary = BTreeMap::new();
        summary.insert("total_domains".to_string(), index.specifications.len());
        summary.insert("total_issues".to_string(), issues.len());
        summary.insert(
            "critical_issues".to_string(),
            count_severity(&issues, Severity::Critical),
        );
        summary.insert(
            "warning_issues".to_string(),
            count_severity(&issues, Severity::Warning),
        );
        summary.insert("info_issues".to_string(), count_severity(&issues, Severity::Info));
        summary.insert("total_paths".to_string(), total_paths);
        summary.insert("total_schemas".to_string(), total_schemas);

        let mut domains: Vec<DomainSummary> = index
            .specifications
            .iter()
            .map(|spec| DomainSummary {
                domain: spec.domain.clone(),
                path_count: spec.path_count,
                schema_count: spec.schema_count,
            })
            .collect();
        domains.sort_by(|a, b| a.domain.cmp(&b.domain));

        Self {
            version: index.version.clone(),
            summary,
            issues,
            domains,
        }
    }

    /// Whether any critical issue was found
    pub fn has_critical(&self) -> bool {
        self.issues.iter().any(|issue| issue.severity == Severity::Critical)
    }
}

/// Check an index for missing version, empty or oddly named domains and
/// duplicate domain names
pub fn validate_index(index: &SpecIndex) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if index.version.is_empty() {
        issues.push(ValidationIssue::new(
            Severity::Critical,
            "index",
            "missing_version",
            "Spec index missing version field",
        ));
    }

    let mut seen = BTreeSet::new();
    let mut duplicates = BTreeSet::new();

    for spec in &index.specifications {
        if !seen.insert(spec.domain.as_str()) {
            duplicates.insert(spec.domain.as_str());
        }

        if spec.path_count == 0 && spec.schema_count == 0 {
            issues.push(ValidationIssue::new(
                Severity::Info,
                &spec.domain,
                "empty_domain",
                "No paths or schemas defined",
            ));
        } else if spec.path_count == 0 || spec.schema_count == 0 {
            issues.push(ValidationIssue::new(
                Severity::Info,
                &spec.domain,
                "asymmetric_coverage",
                format!(
                    "Has {} paths but {} schemas",
                    spec.path_count, spec.schema_count
                ),
            ));
        }

        if !is_valid_domain_name(&spec.domain) {
            issues.push(ValidationIssue::new(
                Severity::Warning,
                &spec.domain,
                "invalid_domain_name",
                "Domain name doesn't follow snake_case convention",
            ));
        }
    }

    if !duplicates.is_empty() {
        let names: Vec<&str> = duplicates.into_iter().collect();
        issues.push(ValidationIssue::new(
            Severity::Critical,
            "index",
            "duplicate_domains",
            format!("Duplicate domain names detected: {}", names.join(", ")),
        ));
    }

    issues
}

/// Whether a domain name is snake_case: lowercase letters, digits, underscores
pub fn is_valid_domain_name(domain: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[a-z0-9_]+$").expect("domain name pattern is valid"))
        .is_match(domain)
}

/// Issues of one severity
pub fn filter_by_severity(issues: &[ValidationIssue], severity: Severity) -> Vec<&ValidationIssue> {
    issues.iter().filter(|issue| issue.severity == severity).collect()
}

fn count_severity(issues: &[ValidationIssue], severity: Severity) -> usize {
    issues.iter().filter(|issue| issue.severity == severity).count()
}
