//! Plugin registry.
//!
//! # Responsibilities
//! - Map stable plugin ids to loaded plugin instances
//! - Enforce API-version compatibility at load time
//! - Drive the lifecycle operations (init, atexit, install, uninstall,
//!   update)
//!
//! # Design Decisions
//! - Ordered map: admin screens and route mounting iterate
//!   deterministically
//! - Loading is bootstrap-time; the registry is read-only afterwards and
//!   shared via Arc with the admin screens

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use crate::config::SettingsStore;
use crate::plugins::{Plugin, HOST_API_VERSIONS};

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("plugin {id} targets unsupported API version {version}")]
    IncompatibleApi { id: String, version: u32 },

    #[error("plugin id already registered: {0}")]
    DuplicateId(String),

    #[error("no plugin registered under id: {0}")]
    Unknown(String),

    #[error("plugin {id} failed during {operation}")]
    Lifecycle {
        id: String,
        operation: &'static str,
        #[source]
        source: crate::dispatch::AppError,
    },
}

/// Registry of loaded plugins, keyed by stable id.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: BTreeMap<String, Arc<dyn Plugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a plugin: negotiate the API version, then run `init`.
    pub fn load(
        &mut self,
        plugin: Arc<dyn Plugin>,
        settings: &SettingsStore,
    ) -> Result<(), PluginError> {
        let id = plugin.id().to_owned();
        let version = plugin.api_version();

        if !HOST_API_VERSIONS.contains(&version) {
            return Err(PluginError::IncompatibleApi { id, version });
        }
        if self.plugins.contains_key(&id) {
            return Err(PluginError::DuplicateId(id));
        }

        plugin.init(settings).map_err(|source| PluginError::Lifecycle {
            id: id.clone(),
            operation: "init",
            source,
        })?;

        tracing::info!(plugin = %id, api_version = version, "plugin loaded");
        self.plugins.insert(id, plugin);
        Ok(())
    }

    /// Unload a plugin, running its `atexit` hook.
    pub fn unload(&mut self, id: &str) -> Result<(), PluginError> {
        let plugin = self
            .plugins
            .remove(id)
            .ok_or_else(|| PluginError::Unknown(id.to_owned()))?;
        plugin.atexit();
        tracing::info!(plugin = %id, "plugin unloaded");
        Ok(())
    }

    /// Run one of the admin-facing lifecycle operations.
    pub fn install(&self, id: &str) -> Result<(), PluginError> {
        self.lifecycle(id, "install", |p| p.install())
    }

    pub fn uninstall(&self, id: &str) -> Result<(), PluginError> {
        self.lifecycle(id, "uninstall", |p| p.uninstall())
    }

    pub fn update(&self, id: &str) -> Result<(), PluginError> {
        self.lifecycle(id, "update", |p| p.update())
    }

    fn lifecycle(
        &self,
        id: &str,
        operation: &'static str,
        f: impl FnOnce(&dyn Plugin) -> Result<(), crate::dispatch::AppError>,
    ) -> Result<(), PluginError> {
        let plugin = self.get(id).ok_or_else(|| PluginError::Unknown(id.to_owned()))?;
        f(plugin.as_ref()).map_err(|source| PluginError::Lifecycle {
            id: id.to_owned(),
            operation,
            source,
        })
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn Plugin>> {
        self.plugins.get(id)
    }

    /// Iterate loaded plugins in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Plugin>> {
        self.plugins.values()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Run `atexit` for every still-loaded plugin, last id first. Called
    /// once at host shutdown, after the server has drained.
    pub fn shutdown(&self) {
        for (id, plugin) in self.plugins.iter().rev() {
            plugin.atexit();
            tracing::debug!(plugin = %id, "plugin shut down");
        }
    }
}
