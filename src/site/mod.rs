//! Site composition subsystem.
//!
//! # Data Flow
//! ```text
//! Bootstrap (once, before the first request):
//!     frontend::routes()            (public subtree at the root)
//!     + "admin" → admin::routes()   (admin-backend subtree)
//!     + plugin-contributed subtrees (from the registry)
//!     + root "_prelude"             (identity resolution)
//!     + root "_notfound"            (404 page)
//!     → frozen root ActionTree, shared via Arc
//! ```
//!
//! # Design Decisions
//! - The public site lives at the tree root; admin is a nested subtree
//!   with its own prelude, so admin redirects stay inside `/admin`
//! - Plugin mounts never displace core segments; collisions are logged
//!   and skipped
//! - CRUD internals are collaborator territory; handlers here only wire
//!   paths to templates

pub mod admin;
pub mod frontend;

use std::sync::Arc;

use crate::dispatch::node::{ActionNode, ActionTree};
use crate::dispatch::path;
use crate::plugins::PluginRegistry;

/// Compose the root action tree. Must run before the first dispatch.
pub fn bootstrap(registry: Arc<PluginRegistry>) -> ActionTree {
    let mut root = frontend::routes();

    root.insert("admin", ActionNode::subtree(admin::routes(registry.clone())));

    for plugin in registry.iter() {
        let Some((segment, node)) = plugin.routes() else {
            continue;
        };
        if root.contains(&segment) {
            tracing::warn!(
                plugin = plugin.id(),
                segment = %segment,
                "plugin route collides with an existing segment, skipping"
            );
            continue;
        }
        tracing::debug!(plugin = plugin.id(), segment = %segment, "plugin route mounted");
        root.insert(segment, node);
    }

    // Identity resolution for the whole walk: turns the transport-level
    // credential into a user on the context.
    root.insert(
        path::PRELUDE,
        ActionNode::terminal(|ctx, _, _| {
            if let Some(token) = ctx.auth_token.clone() {
                ctx.user = ctx.auth().authenticate(&token);
            }
            Ok(())
        }),
    );

    root.insert(
        path::NOT_FOUND,
        ActionNode::terminal(|ctx, _, _| {
            ctx.set_status(404);
            ctx.render("not_found")
        }),
    );

    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettingsStore;
    use crate::plugins::sitemap::SitemapPlugin;

    #[test]
    fn root_tree_contains_core_and_plugin_mounts() {
        let settings = SettingsStore::default();
        let mut registry = PluginRegistry::new();
        registry.load(Arc::new(SitemapPlugin), &settings).unwrap();

        let root = bootstrap(Arc::new(registry));
        assert!(root.contains(path::INDEX));
        assert!(root.contains("admin"));
        assert!(root.contains("sitemap"));
        assert!(root.contains(path::NOT_FOUND));
        assert!(root.contains(path::PRELUDE));
    }
}
