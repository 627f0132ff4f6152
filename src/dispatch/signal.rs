//! Control-flow signals for the dispatch walk.
//!
//! # Responsibilities
//! - Express redirect and not-found as values, not panics
//! - Separate recoverable signals (handler-level) from walk results
//! - Keep application errors opaque to the dispatcher
//!
//! # Design Decisions
//! - `Interrupt` is what a handler raises; the walker consumes `Redirect`
//!   fully and recovers `NotFound` where a `_notfound` key exists
//! - `DispatchError` is what escapes a walk: only `NotFound` and opaque
//!   application failures; `Redirect` never escapes
//! - Application errors are boxed and untyped here: the dispatcher does
//!   not retry or interpret business failures

use thiserror::Error;

use crate::dispatch::path::DispatchPath;

/// Opaque error raised by handler business logic. Fatal to the request;
/// only the transport boundary turns it into a response.
pub type AppError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Signal raised by a node invocation to alter the walk.
#[derive(Debug)]
pub enum Interrupt {
    /// Discard the current walk and restart at the given path, scoped to
    /// the root of the tree that was active at invocation.
    Redirect(DispatchPath),
    /// Routing miss; recovered by the nearest enclosing `_notfound`, else
    /// propagated to the walk's caller.
    NotFound,
    /// Opaque application failure; always propagated.
    App(AppError),
}

impl Interrupt {
    /// Build a redirect from segment literals.
    pub fn redirect<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Interrupt::Redirect(DispatchPath::from_segments(segments))
    }

    /// Wrap an application failure.
    pub fn app(err: impl Into<AppError>) -> Self {
        Interrupt::App(err.into())
    }
}

/// Terminal outcome of one walk over one tree.
#[derive(Debug)]
pub enum WalkEnd {
    /// All segments consumed, hooks included.
    Done,
    /// A `..` segment halted the walk; the unconsumed tail is handed back
    /// to the enclosing subtree caller.
    Popped(DispatchPath),
}

/// Failure escaping a walk.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No exact key, `_default`, or `_notfound` anywhere along the
    /// containment chain resolved the path.
    #[error("no handler matched the requested path")]
    NotFound,

    /// A handler raised an opaque application failure.
    #[error("handler failed")]
    App(#[source] AppError),
}
