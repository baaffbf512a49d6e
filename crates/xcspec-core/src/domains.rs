//! Resource domains and their aliases

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::error::{CoreError, Result};

/// Action commands every domain provides; domains and extensions may not
/// reuse these names
pub const RESERVED_ACTIONS: &[&str] = &[
    "list",
    "get",
    "create",
    "delete",
    "replace",
    "apply",
    "status",
    "patch",
    "add-labels",
    "remove-labels",
];

/// (name, display name, description, aliases)
const BUILTIN_DOMAINS: &[(&str, &str, &str, &[&str])] = &[
    ("load_balancer", "Load Balancer", "HTTP, TCP, UDP load balancing and origin pool management", &["lb"]),
    ("security", "Security", "WAF policies, bot defense, service policies, and threat protection", &["sec"]),
    ("networking", "Networking", "Networks, DNS zones, routing, BGP, and virtual connectivity", &["net"]),
    ("infrastructure", "Infrastructure", "Sites, fleets, cloud provisioning, and cluster management", &["infra"]),
    ("observability", "Observability", "Monitoring, logging, alerts, metrics, and dashboards", &["obs", "o11y"]),
    ("identity", "Identity", "Namespaces, users, roles, authentication, and access control", &["iam"]),
    ("api_security", "API Security", "API discovery, testing, crawling, and endpoint protection", &["apisec"]),
    ("service_mesh", "Service Mesh", "Service mesh configuration, discovery, and orchestration", &["mesh"]),
    ("shape_security", "Shape Security", "Advanced bot protection, device identification, and client defense", &["shape"]),
    ("infrastructure_protection", "Infrastructure Protection", "DDoS protection, alerts, events, and mitigation policies", &["infraprot"]),
    ("applications", "Applications", "Application deployment, management, and configuration", &["app", "apps"]),
    ("integrations", "Integrations", "Third-party integrations and external connectors", &["int", "connect"]),
    ("cdn", "CDN", "Content delivery network, caching, and distribution", &[]),
    ("bigip", "BIG-IP", "BIG-IP integration and management", &[]),
    ("nginx", "NGINX", "NGINX configuration and management", &[]),
    ("operations", "Operations", "Operational tasks, workflows, and system operations", &["ops"]),
    ("subscriptions", "Subscriptions", "Subscription management and plan administration", &["sub"]),
    ("tenant_management", "Tenant Management", "Tenant administration, organization management, and governance", &["tenant"]),
    ("billing", "Billing", "Billing, usage tracking, and payment management", &[]),
    ("vpn", "VPN", "VPN configuration and remote access management", &[]),
    ("ai_intelligence", "AI Intelligence", "AI and machine learning features and capabilities", &["ai"]),
    ("config", "Configuration", "System configuration and settings management", &[]),
];

/// Whether `name` is one of the reserved action commands
pub fn is_reserved_action(name: &str) -> bool {
    RESERVED_ACTIONS.contains(&name)
}

/// Check extension command names against the reserved actions
///
/// Fails on the first name that collides.
pub fn validate_extension_commands<I, S>(names: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for name in names {
        let name = name.as_ref();
        if is_reserved_action(name) {
            return Err(CoreError::ReservedCommand(name.to_string()));
        }
    }
    Ok(())
}

/// Metadata about a resource domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainInfo {
    /// Canonical name, e.g. `load_balancer`
    pub name: String,
    pub display_name: String,
    pub description: String,
    /// Short forms, e.g. `lb`
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl DomainInfo {
    pub fn new(name: &str, display_name: &str, description: &str, aliases: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            description: description.to_string(),
            aliases: aliases.iter().map(|alias| alias.to_string()).collect(),
        }
    }
}

/// Canonical domains and the aliases that resolve to them
#[derive(Debug, Clone, Default)]
pub struct DomainRegistry {
    /// Canonical name -> info, in declaration order
    domains: IndexMap<String, DomainInfo>,
    /// Canonical name or alias -> canonical name
    aliases: HashMap<String, String>,
}

impl DomainRegistry {
    /// The domains the CLI ships with
    pub fn builtin() -> Self {
        let domains = BUILTIN_DOMAINS
            .iter()
            .map(|(name, display_name, description, aliases)| {
                DomainInfo::new(name, display_name, description, aliases)
            });

        let mut registry = Self::default();
        for info in domains {
            registry.insert_unchecked(info);
        }
        registry
    }

    /// Build a registry, rejecting duplicate names, shared aliases and
    /// names that shadow a reserved action
    pub fn from_domains(domains: impl IntoIterator<Item = DomainInfo>) -> Result<Self> {
        let mut registry = Self::default();

        for info in domains {
            if registry.domains.contains_key(&info.name) {
                return Err(CoreError::DuplicateDomain(info.name));
            }
            if let Some(existing) = registry.aliases.get(&info.name) {
                return Err(CoreError::AliasConflict {
                    alias: info.name.clone(),
                    domain: info.name.clone(),
                    existing: existing.clone(),
                });
            }
            if is_reserved_action(&info.name) {
                return Err(CoreError::ReservedCommand(info.name));
            }

            for alias in &info.aliases {
                if is_reserved_action(alias) {
                    return Err(CoreError::ReservedCommand(alias.clone()));
                }
                let taken = registry
                    .aliases
                    .get(alias)
                    .cloned()
                    .or_else(|| (*alias == info.name).then(|| info.name.clone()));
                if let Some(existing) = taken {
                    return Err(CoreError::AliasConflict {
                        alias: alias.clone(),
                        domain: info.name.clone(),
                        existing,
                    });
                }
            }

            registry.insert_unchecked(info);
        }

        debug!("Registered {} domains", registry.domains.len());
        Ok(registry)
    }

    fn insert_unchecked(&mut self, info: DomainInfo) {
        self.aliases.insert(info.name.clone(), info.name.clone());
        for alias in &info.aliases {
            self.aliases.insert(alias.clone(), info.name.clone());
        }
        self.domains.insert(info.name.clone(), info);
    }

    /// Canonical name for a canonical name or alias
    pub fn resolve(&self, name_or_alias: &str) -> Option<&str> {
        self.aliases.get(name_or_alias).map(String::as_str)
    }

    /// Domain metadata by canonical name or alias
    pub fn get(&self, name_or_alias: &str) -> Option<&DomainInfo> {
        self.domains.get(self.resolve(name_or_alias)?)
    }

    /// Like [`get`](Self::get) but fails with `UnknownDomain`
    pub fn require(&self, name_or_alias: &str) -> Result<&DomainInfo> {
        self.get(name_or_alias)
            .ok_or_else(|| CoreError::UnknownDomain(name_or_alias.to_string()))
    }

    pub fn is_valid_domain(&self, name_or_alias: &str) -> bool {
        self.aliases.contains_key(name_or_alias)
    }

    /// All canonical domain names, sorted
    pub fn all_domains(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.domains.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Domain metadata in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &DomainInfo> {
        self.domains.values()
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}
