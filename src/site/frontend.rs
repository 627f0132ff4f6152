//! Public-site subtree.
//!
//! Routes the anonymous surface: front page, single articles, the login
//! screen, and the feed. Handlers wire paths to templates and consume
//! trailing arguments; content storage stays behind collaborators.

use crate::dispatch::node::{ActionNode, ActionTree};
use crate::dispatch::signal::Interrupt;

/// Build the public subtree (mounted at the tree root).
pub fn routes() -> ActionTree {
    ActionTree::new()
        .with(
            "_index",
            ActionNode::terminal(|ctx, _, _| {
                let site = ctx.settings().snapshot().site.clone();
                ctx.set_var("site_title", site.title);
                ctx.set_var("tagline", site.tagline);
                ctx.render("home")
            }),
        )
        .with(
            "article",
            ActionNode::terminal(|ctx, _, path| {
                // The trailing segment is the article id; without one the
                // request is a routing miss, recovered by `_notfound`.
                let id = path.pop_front().ok_or(Interrupt::NotFound)?;
                if id.chars().any(|c| !c.is_ascii_digit()) {
                    return Err(Interrupt::NotFound);
                }
                ctx.set_var("title", format!("Article {}", id));
                ctx.set_var("body", "");
                ctx.set_var("article_id", id);
                ctx.render("article")
            }),
        )
        .with(
            "login",
            ActionNode::terminal(|ctx, _, _| {
                ctx.set_var("notice", "");
                ctx.render("login")
            }),
        )
        .with(
            "feed",
            ActionNode::terminal(|ctx, _, _| {
                let title = ctx.settings().snapshot().site.title.clone();
                ctx.set_var("site_title", title);
                ctx.render("feed")
            }),
        )
}
