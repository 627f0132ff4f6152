//! Pressgate: a content-management front controller built around a
//! hierarchical path-dispatch engine.

// Dispatch core
pub mod context;
pub mod dispatch;

// Collaborators
pub mod auth;
pub mod config;
pub mod plugins;
pub mod render;

// Site composition
pub mod site;

// Transport boundary & cross-cutting concerns
pub mod http;
pub mod lifecycle;

pub use config::SiteConfig;
pub use context::{RequestContext, Services};
pub use dispatch::{dispatch, ActionNode, ActionTree, DispatchPath};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
