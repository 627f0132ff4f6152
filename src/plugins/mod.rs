//! Plugin subsystem.
//!
//! # Data Flow
//! ```text
//! config (plugins.enabled ids)
//!     → registry.rs (look up statically compiled plugins by stable id)
//!     → API-version negotiation against HOST_API_VERSIONS
//!     → init() on load, atexit() on unload
//!     → contributed subtrees mounted into the root action tree
//! ```
//!
//! # Design Decisions
//! - No runtime code evaluation: plugins are compiled modules behind a
//!   fixed trait, registered under a stable identifier
//! - Capability negotiation is an explicit version set, not feature
//!   sniffing
//! - Lifecycle is defined: load → init, unload → atexit;
//!   install/uninstall/update are explicit admin operations

pub mod registry;
pub mod sitemap;

pub use registry::{PluginError, PluginRegistry};

use crate::config::SettingsStore;
use crate::dispatch::node::ActionNode;
use crate::dispatch::signal::AppError;

/// Plugin API versions this host can drive.
pub const HOST_API_VERSIONS: &[u32] = &[1, 2];

/// Fixed lifecycle interface every plugin implements.
///
/// Only `id`, `api_version`, and `init` are mandatory; the remaining
/// operations default to no-ops so small plugins stay small.
pub trait Plugin: Send + Sync {
    /// Stable identifier used in config and the admin screen.
    fn id(&self) -> &str;

    /// Plugin API version this plugin was written against.
    fn api_version(&self) -> u32;

    /// Called once when the plugin is loaded into the registry.
    fn init(&self, settings: &SettingsStore) -> Result<(), AppError>;

    /// Called when the plugin is unloaded or the host shuts down.
    fn atexit(&self) {}

    /// One-time installation (schema setup and the like).
    fn install(&self) -> Result<(), AppError> {
        Ok(())
    }

    /// Remove everything `install` created.
    fn uninstall(&self) -> Result<(), AppError> {
        Ok(())
    }

    /// Migrate from a previously installed version.
    fn update(&self) -> Result<(), AppError> {
        Ok(())
    }

    /// Subtree contributed to the root action tree, keyed by the returned
    /// segment. `None` for plugins without routes.
    fn routes(&self) -> Option<(String, ActionNode)> {
        None
    }
}
