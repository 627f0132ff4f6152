//! Handler combinators and the action tree.
//!
//! # Responsibilities
//! - Define the closed set of handler node kinds
//! - Map segment names to nodes, including the reserved hook keys
//! - Offer a builder API for composing trees at startup
//!
//! # Design Decisions
//! - `ActionNode` is a closed enum: the walker can match exhaustively
//! - Terminal handlers are boxed closures behind `Send + Sync`, so a
//!   frozen tree can be shared across worker tasks
//! - Trees are plain maps; resolution order lives in the walker, not here

use std::collections::HashMap;
use std::fmt;

use crate::context::RequestContext;
use crate::dispatch::path::DispatchPath;
use crate::dispatch::signal::Interrupt;

/// Result of one handler invocation. `Ok(())` continues the walk;
/// `Err` raises a control signal or an opaque application failure.
pub type HandlerResult = Result<(), Interrupt>;

/// Boxed terminal handler: `(context, resolved segment, remaining path)`.
///
/// The remaining path is borrowed mutably so the handler can consume
/// trailing arguments (an article id, say) or replace it wholesale.
pub type TerminalFn =
    Box<dyn Fn(&mut RequestContext, &str, &mut DispatchPath) -> HandlerResult + Send + Sync>;

/// One handler node in an action tree.
pub enum ActionNode {
    /// Leaf action; on normal return the walker treats the entire
    /// remaining path as consumed (prelude invocations excepted).
    Terminal(TerminalFn),
    /// Delegates the remaining segments to a nested walk over the inner
    /// tree, sharing the same request context.
    SubTree(ActionTree),
    /// Static rewrite: discard the remaining path and restart dispatch at
    /// the fixed path against the same tree's root.
    Alias(DispatchPath),
}

impl ActionNode {
    /// Wrap a closure as a terminal handler.
    pub fn terminal<F>(f: F) -> Self
    where
        F: Fn(&mut RequestContext, &str, &mut DispatchPath) -> HandlerResult
            + Send
            + Sync
            + 'static,
    {
        ActionNode::Terminal(Box::new(f))
    }

    /// Wrap a tree as a nested subtree node.
    pub fn subtree(tree: ActionTree) -> Self {
        ActionNode::SubTree(tree)
    }

    /// Build an alias to a fixed path.
    pub fn alias<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ActionNode::Alias(DispatchPath::from_segments(segments))
    }
}

impl fmt::Debug for ActionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionNode::Terminal(_) => f.write_str("Terminal(..)"),
            ActionNode::SubTree(tree) => f.debug_tuple("SubTree").field(tree).finish(),
            ActionNode::Alias(path) => f.debug_tuple("Alias").field(path).finish(),
        }
    }
}

/// Mapping from segment name to handler node.
///
/// Keys are unique; inserting twice replaces the earlier node. The five
/// reserved keys (`_index`, `_default`, `_notfound`, `_prelude`,
/// `_epilog`) carry walker-level meaning and never match ordinary
/// content segments arriving from the wire.
#[derive(Debug, Default)]
pub struct ActionTree {
    nodes: HashMap<String, ActionNode>,
}

impl ActionTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, replacing any previous node under the same key.
    pub fn insert(&mut self, segment: impl Into<String>, node: ActionNode) -> Option<ActionNode> {
        self.nodes.insert(segment.into(), node)
    }

    /// Builder-style insert for startup composition.
    pub fn with(mut self, segment: impl Into<String>, node: ActionNode) -> Self {
        self.insert(segment, node);
        self
    }

    pub fn get(&self, segment: &str) -> Option<&ActionNode> {
        self.nodes.get(segment)
    }

    pub fn contains(&self, segment: &str) -> bool {
        self.nodes.contains_key(segment)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
