//! Template rendering collaborator.
//!
//! # Responsibilities
//! - Define the narrow rendering interface handlers emit bodies through
//! - Ship a small built-in renderer for the default site and for tests
//!
//! # Design Decisions
//! - The dispatcher never sees rendered output; handlers write it into
//!   the request context as a side effect
//! - Template language semantics are out of scope: the built-in renderer
//!   does flat `{{name}}` substitution and nothing more
//! - Unknown templates are application errors, not routing misses

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::dispatch::signal::AppError;

/// Renders a template against the request's variable map.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, template: &str, vars: &Map<String, Value>) -> Result<String, AppError>;
}

/// Built-in renderer over an in-memory template table.
#[derive(Debug, Default)]
pub struct StaticRenderer {
    templates: HashMap<String, String>,
}

impl StaticRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderer preloaded with the plain pages the default site and the
    /// error boundary need.
    pub fn with_builtin_templates() -> Self {
        let mut renderer = Self::new();
        renderer.add("home", "<h1>{{site_title}}</h1><p>{{tagline}}</p>");
        renderer.add("article", "<article><h1>{{title}}</h1>{{body}}</article>");
        renderer.add("login", "<form action=\"/login\" method=\"post\">{{notice}}</form>");
        renderer.add("feed", "<feed>{{site_title}}</feed>");
        renderer.add("not_found", "<h1>Not Found</h1><p>{{path}}</p>");
        renderer.add("error", "<h1>Something went wrong</h1>");
        renderer.add("admin/dashboard", "<h1>Dashboard</h1><p>{{user}}</p>");
        renderer.add("admin/login", "<form action=\"/admin/login\" method=\"post\"></form>");
        renderer.add("admin/list", "<h1>{{screen}}</h1><ul>{{items}}</ul>");
        renderer.add("admin/plugins", "<h1>Plugins</h1><ul>{{plugins}}</ul>");
        renderer.add("admin/settings", "<h1>Settings</h1><dl>{{settings}}</dl>");
        renderer
    }

    /// Register or replace a template.
    pub fn add(&mut self, name: impl Into<String>, body: impl Into<String>) {
        self.templates.insert(name.into(), body.into());
    }
}

impl TemplateRenderer for StaticRenderer {
    fn render(&self, template: &str, vars: &Map<String, Value>) -> Result<String, AppError> {
        let body = self
            .templates
            .get(template)
            .ok_or_else(|| -> AppError { format!("unknown template: {}", template).into() })?;

        let mut out = body.clone();
        for (key, value) in vars {
            let needle = format!("{{{{{}}}}}", key);
            if !out.contains(&needle) {
                continue;
            }
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            out = out.replace(&needle, &text);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_known_variables() {
        let mut renderer = StaticRenderer::new();
        renderer.add("page", "<h1>{{title}}</h1>");
        let mut vars = Map::new();
        vars.insert("title".into(), Value::String("Welcome".into()));
        let out = renderer.render("page", &vars).unwrap();
        assert_eq!(out, "<h1>Welcome</h1>");
    }

    #[test]
    fn unknown_template_is_an_error() {
        let renderer = StaticRenderer::new();
        assert!(renderer.render("missing", &Map::new()).is_err());
    }

    #[test]
    fn non_string_values_serialize_as_json() {
        let mut renderer = StaticRenderer::new();
        renderer.add("count", "{{n}} items");
        let mut vars = Map::new();
        vars.insert("n".into(), Value::from(3));
        assert_eq!(renderer.render("count", &vars).unwrap(), "3 items");
    }
}
