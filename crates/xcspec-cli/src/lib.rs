//! # xcspec-cli
//!
//! Command-line front end for the spec index: lists resources and domains,
//! prints example payloads, validates the upstream spec index and edits the
//! settings file.
//! Every command prints JSON on stdout; logs go to stderr.

pub mod commands;
mod context;

pub use context::{
    open_settings, resolve_max_depth, resolve_specs_dir, Workspace, DEFAULT_SPECS_DIR,
};
