//! Path-dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Request path ("/admin/articles/42")
//!     → path.rs (split into segments, normalize empty → ["_index"])
//!     → walker.rs (walk segments against the action tree)
//!         → node.rs (Terminal / SubTree / Alias combinators)
//!         → signal.rs (Redirect / NotFound control signals)
//!     → Return: Done, Popped(tail), or NotFound
//!
//! Tree Composition (at startup):
//!     frontend subtree + admin subtree + plugin subtrees + _notfound
//!     → Freeze as immutable root ActionTree
//!     → Shared via Arc across worker tasks
//! ```
//!
//! # Design Decisions
//! - Trees composed at startup, immutable at runtime
//! - One walk per request, synchronous, no suspension points
//! - Control flow is explicit sum types, never panics or exceptions
//! - Resolution is deterministic: exact key → `_default` → `_notfound`
//! - Redirects rewind to the *current* tree's root, not the global root

pub mod node;
pub mod path;
pub mod signal;
pub mod walker;

pub use node::{ActionNode, ActionTree, HandlerResult};
pub use path::DispatchPath;
pub use signal::{AppError, DispatchError, Interrupt, WalkEnd};
pub use walker::dispatch;
