//! Admin-backend subtree.
//!
//! # Responsibilities
//! - Gate every admin screen behind the auth hook (`_prelude`)
//! - Route the dashboard, content screens, plugin management, settings
//!
//! # Design Decisions
//! - The prelude redirects unauthenticated walks to the admin login
//!   screen; because redirects are scoped to the current tree, the walk
//!   stays inside `/admin`
//! - Plugin lifecycle operations are path arguments
//!   (`/admin/plugins/install/<id>`), consumed by one terminal
//! - Screens render stubs; model CRUD lives behind collaborators

use std::sync::Arc;

use crate::dispatch::node::{ActionNode, ActionTree};
use crate::dispatch::signal::Interrupt;
use crate::plugins::{PluginError, PluginRegistry};

/// Build the admin subtree (mounted under `"admin"`).
pub fn routes(registry: Arc<PluginRegistry>) -> ActionTree {
    let mut tree = ActionTree::new()
        .with(
            "_prelude",
            ActionNode::terminal(|ctx, _, path| {
                // The login screen itself stays reachable, otherwise the
                // redirect below would chase its own tail.
                if path.peek() == Some("login") {
                    return Ok(());
                }
                match &ctx.user {
                    Some(user) if user.is_admin => Ok(()),
                    _ => Err(Interrupt::redirect(["login"])),
                }
            }),
        )
        .with(
            "login",
            ActionNode::terminal(|ctx, _, _| ctx.render("admin/login")),
        )
        .with(
            "_index",
            ActionNode::terminal(|ctx, _, _| {
                let name = ctx.user.as_ref().map(|u| u.name.clone()).unwrap_or_default();
                ctx.set_var("user", name);
                ctx.render("admin/dashboard")
            }),
        )
        .with(
            "settings",
            ActionNode::terminal(|ctx, _, path| {
                // `settings/reload` re-reads the backing config file and
                // swaps the snapshot; without an argument the screen
                // displays the current values.
                if let Some(op) = path.pop_front() {
                    if op != "reload" {
                        return Err(Interrupt::NotFound);
                    }
                    ctx.settings().reload().map_err(Interrupt::app)?;
                    ctx.write_body("settings reload: ok");
                    return Ok(());
                }
                let snapshot = ctx.settings().snapshot();
                let listing = format!(
                    "<dt>site.title</dt><dd>{}</dd><dt>site.base_url</dt><dd>{}</dd>",
                    snapshot.site.title, snapshot.site.base_url
                );
                ctx.set_var("settings", listing);
                ctx.render("admin/settings")
            }),
        );

    for screen in ["articles", "tags", "comments", "users"] {
        tree.insert(screen, list_screen(screen));
    }

    tree.insert("plugins", plugins_screen(registry));
    tree
}

/// Stub listing screen for a content type. A trailing id argument is
/// consumed and surfaced to the template.
fn list_screen(screen: &'static str) -> ActionNode {
    ActionNode::terminal(move |ctx, _, path| {
        ctx.set_var("screen", screen);
        if let Some(id) = path.pop_front() {
            ctx.set_var("selected", id);
        }
        ctx.set_var("items", "");
        ctx.render("admin/list")
    })
}

/// Plugin management: list without arguments, or run a lifecycle
/// operation given `<op>/<plugin-id>`.
fn plugins_screen(registry: Arc<PluginRegistry>) -> ActionNode {
    ActionNode::terminal(move |ctx, _, path| {
        let Some(op) = path.pop_front() else {
            let listing: String = registry
                .iter()
                .map(|p| format!("<li>{} (api v{})</li>", p.id(), p.api_version()))
                .collect();
            ctx.set_var("plugins", listing);
            return ctx.render("admin/plugins");
        };

        let id = path.pop_front().ok_or(Interrupt::NotFound)?;
        let result = match op.as_str() {
            "install" => registry.install(&id),
            "uninstall" => registry.uninstall(&id),
            "update" => registry.update(&id),
            _ => return Err(Interrupt::NotFound),
        };
        match result {
            Ok(()) => {
                ctx.write_body(&format!("{} {}: ok", op, id));
                Ok(())
            }
            Err(PluginError::Unknown(_)) => Err(Interrupt::NotFound),
            Err(err) => Err(Interrupt::app(err)),
        }
    })
}
