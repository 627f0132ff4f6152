//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Load plugins (init) → Compose root tree
//!     → Start HTTP server
//!
//! Shutdown (shutdown.rs):
//!     SIGTERM/SIGINT → trigger coordinator → server drains
//!     → plugin atexit hooks → exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then plugins, then the tree, then
//!   the listener
//! - Plugins shut down after the server stops accepting requests

pub mod shutdown;

pub use shutdown::Shutdown;
