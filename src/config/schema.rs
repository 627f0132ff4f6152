//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files;
//! every section has a `Default` so a minimal (even empty) config loads.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the site.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    /// Public-site settings.
    pub site: SiteSection,

    /// HTTP host settings (transport boundary only).
    pub server: ServerConfig,

    /// Admin-backend settings.
    pub admin: AdminConfig,

    /// Plugin ids to load at bootstrap, in order.
    pub plugins: PluginConfig,

    /// Free-form key-value settings exposed through the settings store.
    pub extra: BTreeMap<String, String>,
}

/// Public-site settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteSection {
    /// Site title shown on rendered pages.
    pub title: String,

    /// Canonical base URL (used in feeds and redirects).
    pub base_url: String,

    /// Tagline rendered on the front page.
    pub tagline: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: "Pressgate".to_string(),
            base_url: "http://localhost:8080".to_string(),
            tagline: String::new(),
        }
    }
}

/// HTTP host settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Per-request timeout at the transport boundary, in seconds.
    /// The dispatch walk itself has no timeout.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Admin-backend settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AdminConfig {
    /// Bearer token granting admin identity. Empty disables admin auth
    /// (every admin request is redirected to the login screen).
    pub api_token: String,
}

/// Plugin loading settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PluginConfig {
    /// Stable ids of plugins to load at bootstrap.
    pub enabled: Vec<String>,
}
