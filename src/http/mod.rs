//! HTTP transport boundary.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, middleware, request id)
//!     → front controller: request path → DispatchPath,
//!       fresh RequestContext, one dispatch walk
//!     → walk outcome + context → HTTP response
//! ```
//!
//! The dispatch engine knows nothing about HTTP; everything
//! transport-shaped stays in this module, including the top-level error
//! boundary (404 and generic failure pages).

pub mod server;

pub use server::{AppState, HttpServer};
