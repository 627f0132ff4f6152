//! Built-in sitemap plugin.
//!
//! Contributes a `/sitemap` route listing the public pages. Doubles as
//! the reference implementation of the plugin interface.

use crate::config::SettingsStore;
use crate::dispatch::node::ActionNode;
use crate::dispatch::signal::AppError;
use crate::plugins::Plugin;

pub struct SitemapPlugin;

impl Plugin for SitemapPlugin {
    fn id(&self) -> &str {
        "sitemap"
    }

    fn api_version(&self) -> u32 {
        1
    }

    fn init(&self, settings: &SettingsStore) -> Result<(), AppError> {
        tracing::debug!(
            base_url = %settings.snapshot().site.base_url,
            "sitemap plugin initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Option<(String, ActionNode)> {
        Some((
            "sitemap".to_owned(),
            ActionNode::terminal(|ctx, _, _| {
                let base = ctx.settings().snapshot().site.base_url.clone();
                ctx.write_body(&format!(
                    "<urlset><url>{base}/</url><url>{base}/feed</url></urlset>"
                ));
                Ok(())
            }),
        ))
    }
}
