//! Per-request shared context.
//!
//! # Responsibilities
//! - Carry mutable state through one entire dispatch walk
//! - Accumulate the response (status + body) written by handlers
//! - Hand injected collaborators (renderer, settings, auth) to handlers
//!
//! # Design Decisions
//! - One context per request, never shared across concurrent walks
//! - Collaborators are `Arc`s bundled into `Services` at bootstrap and
//!   cloned per request; no globals anywhere
//! - Template variables are a JSON map so handlers and the renderer
//!   agree on one value model

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::auth::{AuthContext, AuthUser};
use crate::config::SettingsStore;
use crate::dispatch::signal::Interrupt;
use crate::render::{StaticRenderer, TemplateRenderer};

/// Collaborators injected into every request context.
///
/// Built once at bootstrap; cloning is cheap (all `Arc`s).
#[derive(Clone)]
pub struct Services {
    pub renderer: Arc<dyn TemplateRenderer>,
    pub settings: Arc<SettingsStore>,
    pub auth: Arc<AuthContext>,
}

impl Default for Services {
    /// Minimal service set: built-in renderer, default settings, auth
    /// with no admin token (every token is rejected). Used by tests and
    /// as the base for bootstrap overrides.
    fn default() -> Self {
        let settings = Arc::new(SettingsStore::default());
        Self {
            renderer: Arc::new(StaticRenderer::with_builtin_templates()),
            auth: Arc::new(AuthContext::from_settings(&settings)),
            settings,
        }
    }
}

/// Mutable state bag threaded through one dispatch walk.
pub struct RequestContext {
    /// Correlation id assigned at the transport boundary.
    pub request_id: String,
    /// Raw credential extracted from the request, if any. Read by
    /// `_prelude` hooks to resolve `user`.
    pub auth_token: Option<String>,
    /// Authenticated identity, set by a `_prelude` hook.
    pub user: Option<AuthUser>,
    /// Template variables accumulated by handlers.
    vars: Map<String, Value>,
    /// Response status chosen by handlers; defaults to 200.
    status: u16,
    /// Response body accumulated by handlers.
    body: String,
    services: Services,
}

impl RequestContext {
    pub fn new(services: Services, request_id: String) -> Self {
        Self {
            request_id,
            auth_token: None,
            user: None,
            vars: Map::new(),
            status: 200,
            body: String::new(),
            services,
        }
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.services.settings
    }

    pub fn auth(&self) -> &AuthContext {
        &self.services.auth
    }

    /// Set a template variable.
    pub fn set_var(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn var(&self, key: &str) -> Option<&Value> {
        self.vars.get(key)
    }

    /// Render a template with the accumulated variables and append the
    /// result to the response body. Renderer failures surface as opaque
    /// application errors.
    pub fn render(&mut self, template: &str) -> Result<(), Interrupt> {
        let rendered = self
            .services
            .renderer
            .render(template, &self.vars)
            .map_err(Interrupt::App)?;
        self.body.push_str(&rendered);
        Ok(())
    }

    pub fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn write_body(&mut self, chunk: &str) {
        self.body.push_str(chunk);
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Consume the context into its response parts.
    pub fn into_response_parts(self) -> (u16, String) {
        (self.status, self.body)
    }
}
