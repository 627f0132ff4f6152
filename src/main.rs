//! Pressgate binary entry point.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                 PRESSGATE                     │
//!                    │                                               │
//!   Client Request   │  ┌───────┐   ┌────────────┐   ┌───────────┐  │
//!   ─────────────────┼─▶│ http  │──▶│  dispatch  │──▶│  handlers │  │
//!                    │  │server │   │   walker   │   │ (site/…)  │  │
//!                    │  └───────┘   └─────┬──────┘   └─────┬─────┘  │
//!                    │                    │                │        │
//!                    │       root ActionTree          collaborators │
//!                    │  (frontend + admin + plugins)  (render, auth,│
//!                    │                                 settings)    │
//!                    │                                               │
//!                    │  Cross-cutting: config, plugins, lifecycle,   │
//!                    │  tracing                                      │
//!                    └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pressgate::auth::AuthContext;
use pressgate::config::{load_config, SettingsStore, SiteConfig};
use pressgate::context::Services;
use pressgate::http::HttpServer;
use pressgate::lifecycle::Shutdown;
use pressgate::plugins::{sitemap::SitemapPlugin, Plugin, PluginRegistry};
use pressgate::render::StaticRenderer;
use pressgate::site;

#[derive(Parser, Debug)]
#[command(name = "pressgate", about = "Content-management front controller")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured bind address.
    #[arg(long)]
    bind: Option<String>,
}

/// Statically compiled plugins available to this build, by stable id.
fn builtin_plugin(id: &str) -> Option<Arc<dyn Plugin>> {
    match id {
        "sitemap" => Some(Arc::new(SitemapPlugin)),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pressgate=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => SiteConfig::default(),
    };

    tracing::info!(
        site_title = %config.site.title,
        bind_address = %config.server.bind_address,
        plugins = config.plugins.enabled.len(),
        "configuration loaded"
    );

    let settings = Arc::new(match &args.config {
        Some(path) => SettingsStore::with_source(config, path.clone()),
        None => SettingsStore::new(config),
    });
    let snapshot = settings.snapshot();

    // Load plugins in config order; init runs here, atexit at drain.
    let mut registry = PluginRegistry::new();
    for id in &snapshot.plugins.enabled {
        match builtin_plugin(id) {
            Some(plugin) => registry.load(plugin, &settings)?,
            None => tracing::warn!(plugin = %id, "unknown plugin id in config, skipping"),
        }
    }
    let registry = Arc::new(registry);

    let services = Services {
        renderer: Arc::new(StaticRenderer::with_builtin_templates()),
        auth: Arc::new(AuthContext::from_settings(&settings)),
        settings: settings.clone(),
    };

    let root = Arc::new(site::bootstrap(registry.clone()));

    let bind_address = args
        .bind
        .unwrap_or_else(|| snapshot.server.bind_address.clone());
    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening for connections");

    let shutdown = Shutdown::new();
    spawn_signal_listener(&shutdown);

    let server = HttpServer::new(root, services);
    server.run(listener, &shutdown).await?;

    registry.shutdown();
    tracing::info!("shutdown complete");
    Ok(())
}

/// Trigger the coordinator on SIGINT or SIGTERM.
fn spawn_signal_listener(shutdown: &Shutdown) {
    let shutdown = shutdown.clone();
    tokio::spawn(async move {
        let ctrl_c = async {
            let _ = tokio::signal::ctrl_c().await;
        };
        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut sig) => {
                    sig.recv().await;
                }
                Err(err) => tracing::error!(error = %err, "failed to install SIGTERM handler"),
            }
        };
        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {}
            _ = terminate => {}
        }
        tracing::info!("shutdown signal received");
        shutdown.trigger();
    });
}
