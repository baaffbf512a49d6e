//! # xcspec-core
//!
//! Shared pieces of the xcspec tools:
//! - Domain registry with aliases and reserved action names
//! - Resource catalog grouping indexed resources by domain
//! - Settings persisted in the platform config directory

pub mod catalog;
pub mod domains;
pub mod error;
pub mod settings;

pub use catalog::{CatalogEntry, ResourceCatalog};
pub use domains::{
    is_reserved_action, validate_extension_commands, DomainInfo, DomainRegistry, RESERVED_ACTIONS,
};
pub use error::{CoreError, Result};
pub use settings::{Settings, SettingsManager, SETTINGS_FILE, SETTING_KEYS};
