//! Authentication collaborator.
//!
//! # Responsibilities
//! - Resolve a request credential to an identity for `_prelude` hooks
//! - Keep the auth *hook point* narrow: policy content lives elsewhere
//!
//! # Design Decisions
//! - Token comparison against the configured admin token; session
//!   storage is out of scope behind this interface
//! - Identity travels on the request context, never in globals

use serde::Serialize;

use crate::config::SettingsStore;

/// Authenticated identity carried on the request context.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AuthUser {
    pub name: String,
    pub is_admin: bool,
}

/// Session-backed identity lookup, read by `_prelude` hooks.
pub struct AuthContext {
    admin_token: String,
}

impl AuthContext {
    /// Build from the admin token in the settings snapshot. An empty
    /// token disables authentication entirely.
    pub fn from_settings(settings: &SettingsStore) -> Self {
        Self {
            admin_token: settings.snapshot().admin.api_token.clone(),
        }
    }

    pub fn new(admin_token: impl Into<String>) -> Self {
        Self {
            admin_token: admin_token.into(),
        }
    }

    /// Resolve a bearer token to a user. `None` means unauthenticated.
    pub fn authenticate(&self, token: &str) -> Option<AuthUser> {
        if self.admin_token.is_empty() || token != self.admin_token {
            return None;
        }
        Some(AuthUser {
            name: "admin".to_owned(),
            is_admin: true,
        })
    }
}
