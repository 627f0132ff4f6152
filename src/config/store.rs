//! Settings store: the live configuration handle.
//!
//! # Responsibilities
//! - Hold the current validated config snapshot
//! - Offer dotted key-value lookup for handlers and templates
//! - Swap the snapshot atomically on admin-triggered reload
//!
//! # Design Decisions
//! - `arc-swap` handle: readers never lock, in-flight requests keep the
//!   snapshot they started with
//! - Known sections resolve by field; everything else falls back to the
//!   free-form `extra` table

use std::path::PathBuf;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::loader::{load_config, ConfigError};
use crate::config::schema::SiteConfig;

/// Shared handle to the current site configuration.
pub struct SettingsStore {
    current: ArcSwap<SiteConfig>,
    /// File the snapshot was loaded from; reload re-reads it.
    source: Option<PathBuf>,
}

impl SettingsStore {
    pub fn new(config: SiteConfig) -> Self {
        Self {
            current: ArcSwap::from_pointee(config),
            source: None,
        }
    }

    /// Store backed by a config file, enabling admin-triggered reload.
    pub fn with_source(config: SiteConfig, source: PathBuf) -> Self {
        Self {
            current: ArcSwap::from_pointee(config),
            source: Some(source),
        }
    }

    /// The current snapshot. Cheap; hold it for the whole request.
    pub fn snapshot(&self) -> Arc<SiteConfig> {
        self.current.load_full()
    }

    /// Replace the snapshot. Callers validate first.
    pub fn replace(&self, config: SiteConfig) {
        self.current.store(Arc::new(config));
        tracing::info!("settings snapshot replaced");
    }

    /// Re-read the backing config file, validate it, and swap the
    /// snapshot. In-flight requests keep the snapshot they started with;
    /// on any failure the current snapshot stays in place.
    pub fn reload(&self) -> Result<(), ConfigError> {
        let source = self.source.as_deref().ok_or(ConfigError::NoSource)?;
        let config = load_config(source)?;
        self.replace(config);
        Ok(())
    }

    /// Dotted key-value lookup over the known sections, falling back to
    /// the `extra` table.
    pub fn get(&self, key: &str) -> Option<String> {
        let snapshot = self.snapshot();
        match key {
            "site.title" => Some(snapshot.site.title.clone()),
            "site.base_url" => Some(snapshot.site.base_url.clone()),
            "site.tagline" => Some(snapshot.site.tagline.clone()),
            "server.bind_address" => Some(snapshot.server.bind_address.clone()),
            "server.request_timeout_secs" => {
                Some(snapshot.server.request_timeout_secs.to_string())
            }
            other => snapshot.extra.get(other).cloned(),
        }
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(SiteConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_and_extra_keys() {
        let mut config = SiteConfig::default();
        config.site.title = "My Site".into();
        config.extra.insert("theme".into(), "dark".into());
        let store = SettingsStore::new(config);

        assert_eq!(store.get("site.title").as_deref(), Some("My Site"));
        assert_eq!(store.get("theme").as_deref(), Some("dark"));
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn reload_reads_the_backing_file() {
        let path = std::env::temp_dir().join(format!("pressgate-reload-{}.toml", std::process::id()));
        std::fs::write(&path, "[site]\ntitle = \"First\"\n").unwrap();
        let store =
            SettingsStore::with_source(load_config(&path).unwrap(), path.clone());
        assert_eq!(store.get("site.title").as_deref(), Some("First"));

        std::fs::write(&path, "[site]\ntitle = \"Second\"\n").unwrap();
        store.reload().unwrap();
        assert_eq!(store.get("site.title").as_deref(), Some("Second"));
    }

    #[test]
    fn reload_without_a_source_is_an_error() {
        let store = SettingsStore::default();
        assert!(matches!(store.reload(), Err(ConfigError::NoSource)));
        assert_eq!(store.snapshot().site.title, "Pressgate");
    }

    #[test]
    fn replace_swaps_snapshot_for_new_readers() {
        let store = SettingsStore::default();
        let before = store.snapshot();

        let mut updated = SiteConfig::default();
        updated.site.title = "Renamed".into();
        store.replace(updated);

        assert_eq!(before.site.title, "Pressgate");
        assert_eq!(store.snapshot().site.title, "Renamed");
    }
}
