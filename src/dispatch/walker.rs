//! The dispatch walk state machine.
//!
//! # Data Flow
//! ```text
//! Start:      empty path → ["_index"]; prepend "_prelude" if declared
//! Resolving:  exact key → _default → _notfound → raise NotFound
//! Invoking:   run node on (context, segment, &mut remaining)
//! Advancing:  more segments → Resolving; else fire _epilog once; else Done
//! Popped:     ".." halts the walk, tail returned to the subtree caller
//! ```
//!
//! # Design Decisions
//! - Redirects (and aliases) restart at the *current* tree's root and
//!   re-run `_prelude`; nesting composes redirect scopes
//! - A handler-raised `NotFound` re-enters resolution at `_notfound`
//!   without re-running `_prelude`; an unrecovered miss escapes the walk
//! - `_epilog` is guarded by a re-trigger flag so it fires at most once
//!   per tree entry; the flag re-arms on a redirect restart
//! - Restarts are capped: repeated redirects (A → B → A) would otherwise
//!   spin forever, a latent flaw this port refuses to inherit

use crate::context::RequestContext;
use crate::dispatch::node::{ActionNode, ActionTree, HandlerResult};
use crate::dispatch::path::{self, DispatchPath};
use crate::dispatch::signal::{DispatchError, Interrupt, WalkEnd};

/// Upper bound on redirect restarts and not-found recoveries within one
/// walk. Far above any legitimate chain; overflow surfaces as an opaque
/// application error instead of hanging the worker.
pub const MAX_RESTARTS: usize = 32;

/// Walk `path` against `tree`, mutating `ctx` along the way.
///
/// Returns `Done` when every segment (hooks included) was consumed,
/// `Popped(tail)` when a `..` segment handed the unconsumed tail back to
/// the caller, or an error when the path could not be resolved or a
/// handler failed. `Redirect` never escapes: it is always recovered here.
pub fn dispatch(
    tree: &ActionTree,
    ctx: &mut RequestContext,
    mut path: DispatchPath,
) -> Result<WalkEnd, DispatchError> {
    let mut restarts = 0usize;

    // One iteration of the outer loop is one entry into this tree:
    // normalization and the prelude hook run again after every restart.
    'entry: loop {
        if path.is_empty() {
            path.push_back(path::INDEX);
        }
        if tree.contains(path::PRELUDE) {
            path.push_front(path::PRELUDE);
        }
        let mut epilog_fired = false;

        loop {
            let segment = match path.pop_front() {
                Some(segment) => segment,
                None if tree.contains(path::EPILOG) && !epilog_fired => {
                    epilog_fired = true;
                    path::EPILOG.to_owned()
                }
                None => return Ok(WalkEnd::Done),
            };

            if segment == path::POP {
                tracing::trace!(tail = %path, "walk popped to parent");
                return Ok(WalkEnd::Popped(path));
            }

            let node = tree
                .get(&segment)
                .or_else(|| tree.get(path::DEFAULT))
                .or_else(|| tree.get(path::NOT_FOUND))
                .ok_or(DispatchError::NotFound)?;

            match invoke(node, ctx, &segment, &mut path) {
                Ok(()) => {}
                Err(Interrupt::Redirect(target)) => {
                    restarts += 1;
                    if restarts > MAX_RESTARTS {
                        return Err(DispatchError::App(
                            format!("redirect limit exceeded at {}", target).into(),
                        ));
                    }
                    tracing::debug!(target = %target, "walk restarting on redirect");
                    path = target;
                    continue 'entry;
                }
                Err(Interrupt::NotFound) => {
                    if tree.contains(path::NOT_FOUND) {
                        restarts += 1;
                        if restarts > MAX_RESTARTS {
                            return Err(DispatchError::App(
                                "not-found recovery limit exceeded".into(),
                            ));
                        }
                        path.clear();
                        path.push_back(path::NOT_FOUND);
                    } else {
                        return Err(DispatchError::NotFound);
                    }
                }
                Err(Interrupt::App(err)) => return Err(DispatchError::App(err)),
            }
        }
    }
}

/// Run one node against the remaining path.
fn invoke(
    node: &ActionNode,
    ctx: &mut RequestContext,
    segment: &str,
    path: &mut DispatchPath,
) -> HandlerResult {
    match node {
        ActionNode::Terminal(f) => {
            f(ctx, segment, path)?;
            // A terminal consumes the entire remaining path. The prelude
            // hook is the exception: it runs around the walk and leaves
            // the pending segments for the ordinary resolution to follow.
            if segment != path::PRELUDE {
                path.clear();
            }
            Ok(())
        }
        ActionNode::SubTree(inner) => match dispatch(inner, ctx, path.take()) {
            Ok(WalkEnd::Done) => Ok(()),
            Ok(WalkEnd::Popped(tail)) => {
                // The child walked up to a `..`; its leftover becomes our
                // remaining path and the outer walk resumes.
                *path = tail;
                Ok(())
            }
            Err(DispatchError::NotFound) => Err(Interrupt::NotFound),
            Err(DispatchError::App(err)) => Err(Interrupt::App(err)),
        },
        ActionNode::Alias(fixed) => Err(Interrupt::Redirect(fixed.clone())),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::context::{RequestContext, Services};
    use crate::dispatch::node::ActionNode;

    type Trace = Arc<Mutex<Vec<String>>>;

    fn ctx() -> RequestContext {
        RequestContext::new(Services::default(), "test".into())
    }

    /// Terminal that records `label` and leaves the path alone.
    fn record(trace: &Trace, label: &str) -> ActionNode {
        let trace = trace.clone();
        let label = label.to_owned();
        ActionNode::terminal(move |_, _, _| {
            trace.lock().unwrap().push(label.clone());
            Ok(())
        })
    }

    fn taken(trace: &Trace) -> Vec<String> {
        trace.lock().unwrap().clone()
    }

    #[test]
    fn empty_path_normalizes_to_index() {
        let trace: Trace = Default::default();
        let tree = ActionTree::new().with("_index", record(&trace, "index"));
        let end = dispatch(&tree, &mut ctx(), DispatchPath::new()).unwrap();
        assert!(matches!(end, WalkEnd::Done));
        assert_eq!(taken(&trace), ["index"]);
    }

    #[test]
    fn terminal_consumes_remaining_segments() {
        let trace: Trace = Default::default();
        let tree = ActionTree::new()
            .with("a", record(&trace, "a"))
            .with("b", record(&trace, "b"));
        let end = dispatch(&tree, &mut ctx(), DispatchPath::from_segments(["a", "b", "c"]));
        assert!(matches!(end.unwrap(), WalkEnd::Done));
        // "b" and "c" were consumed by the terminal at "a".
        assert_eq!(taken(&trace), ["a"]);
    }

    #[test]
    fn prelude_runs_before_first_segment_without_consuming() {
        let trace: Trace = Default::default();
        let tree = ActionTree::new()
            .with("_prelude", record(&trace, "pre"))
            .with("a", record(&trace, "a"));
        dispatch(&tree, &mut ctx(), DispatchPath::from_segments(["a"])).unwrap();
        assert_eq!(taken(&trace), ["pre", "a"]);
    }

    #[test]
    fn default_then_epilog_fires_exactly_once() {
        let trace: Trace = Default::default();
        let tree = ActionTree::new()
            .with("_default", record(&trace, "default"))
            .with("_epilog", record(&trace, "epilog"));
        let end = dispatch(&tree, &mut ctx(), DispatchPath::from_segments(["x"])).unwrap();
        assert!(matches!(end, WalkEnd::Done));
        assert_eq!(taken(&trace), ["default", "epilog"]);
    }

    #[test]
    fn epilog_does_not_retrigger_itself() {
        let trace: Trace = Default::default();
        // An epilog that raises NotFound would re-enter resolution; the
        // re-trigger guard keeps it from firing a second time.
        let tree = ActionTree::new()
            .with("_index", record(&trace, "index"))
            .with("_notfound", record(&trace, "notfound"))
            .with("_epilog", {
                let trace = trace.clone();
                ActionNode::terminal(move |_, _, _| {
                    trace.lock().unwrap().push("epilog".into());
                    Err(Interrupt::NotFound)
                })
            });
        dispatch(&tree, &mut ctx(), DispatchPath::new()).unwrap();
        assert_eq!(taken(&trace), ["index", "epilog", "notfound"]);
    }

    #[test]
    fn exact_match_beats_default() {
        let trace: Trace = Default::default();
        let tree = ActionTree::new()
            .with("a", record(&trace, "exact"))
            .with("_default", record(&trace, "default"));
        dispatch(&tree, &mut ctx(), DispatchPath::from_segments(["a"])).unwrap();
        assert_eq!(taken(&trace), ["exact"]);
    }

    #[test]
    fn unresolved_segment_without_fallbacks_escapes_as_not_found() {
        let tree = ActionTree::new().with("a", ActionNode::terminal(|_, _, _| Ok(())));
        let err = dispatch(&tree, &mut ctx(), DispatchPath::from_segments(["zzz"]));
        assert!(matches!(err, Err(DispatchError::NotFound)));
    }

    #[test]
    fn raised_not_found_recovers_via_notfound_key() {
        let trace: Trace = Default::default();
        let tree = ActionTree::new()
            .with("a", {
                let trace = trace.clone();
                ActionNode::terminal(move |_, _, _| {
                    trace.lock().unwrap().push("a".into());
                    Err(Interrupt::NotFound)
                })
            })
            .with("_notfound", record(&trace, "notfound"));
        dispatch(&tree, &mut ctx(), DispatchPath::from_segments(["a"])).unwrap();
        assert_eq!(taken(&trace), ["a", "notfound"]);
    }

    #[test]
    fn redirect_restarts_at_current_tree_root_and_reruns_prelude() {
        let trace: Trace = Default::default();
        let tree = ActionTree::new()
            .with("_prelude", record(&trace, "pre"))
            .with("x", {
                let trace = trace.clone();
                ActionNode::terminal(move |_, _, _| {
                    trace.lock().unwrap().push("x".into());
                    Err(Interrupt::redirect(["a", "b"]))
                })
            })
            .with("a", {
                let trace = trace.clone();
                ActionNode::terminal(move |_, _, path| {
                    trace.lock().unwrap().push("a".into());
                    // Forward the leftover ["b"] as a fresh redirect.
                    Err(Interrupt::Redirect(path.take()))
                })
            })
            .with("b", record(&trace, "b"));
        dispatch(&tree, &mut ctx(), DispatchPath::from_segments(["x"])).unwrap();
        assert_eq!(taken(&trace), ["pre", "x", "pre", "a", "pre", "b"]);
    }

    #[test]
    fn alias_matches_direct_dispatch_trace() {
        let build = |trace: &Trace, with_alias: bool| {
            let mut tree = ActionTree::new().with("login", record(trace, "login"));
            if with_alias {
                tree.insert("_index", ActionNode::alias(["login"]));
            }
            tree
        };

        let aliased: Trace = Default::default();
        dispatch(
            &build(&aliased, true),
            &mut ctx(),
            DispatchPath::from_segments(["_index"]),
        )
        .unwrap();

        let direct: Trace = Default::default();
        dispatch(
            &build(&direct, false),
            &mut ctx(),
            DispatchPath::from_segments(["login"]),
        )
        .unwrap();

        assert_eq!(taken(&aliased), taken(&direct));
        assert_eq!(taken(&direct), ["login"]);
    }

    #[test]
    fn pop_segment_returns_unconsumed_tail() {
        let tree = ActionTree::new();
        let end = dispatch(
            &tree,
            &mut ctx(),
            DispatchPath::from_segments(["..", "rest", "of", "tail"]),
        )
        .unwrap();
        match end {
            WalkEnd::Popped(tail) => {
                assert_eq!(tail.iter().collect::<Vec<_>>(), vec!["rest", "of", "tail"]);
            }
            other => panic!("expected pop, got {:?}", other),
        }
    }

    #[test]
    fn subtree_pop_hands_tail_back_to_parent() {
        let trace: Trace = Default::default();
        // The child sees ["..", "after"], halts on the pop sentinel, and
        // hands ["after"] back for the parent tree to resolve.
        let tree = ActionTree::new()
            .with("child", ActionNode::subtree(ActionTree::new()))
            .with("after", record(&trace, "after"));
        dispatch(
            &tree,
            &mut ctx(),
            DispatchPath::from_segments(["child", "..", "after"]),
        )
        .unwrap();
        assert_eq!(taken(&trace), ["after"]);
    }

    #[test]
    fn subtree_not_found_recovers_in_parent() {
        let trace: Trace = Default::default();
        let child = ActionTree::new();
        let tree = ActionTree::new()
            .with("child", ActionNode::subtree(child))
            .with("_notfound", record(&trace, "notfound"));
        dispatch(
            &tree,
            &mut ctx(),
            DispatchPath::from_segments(["child", "missing"]),
        )
        .unwrap();
        assert_eq!(taken(&trace), ["notfound"]);
    }

    #[test]
    fn nested_redirect_rewinds_to_nested_root_only() {
        let trace: Trace = Default::default();
        let child = ActionTree::new()
            .with("_prelude", record(&trace, "child-pre"))
            .with("jump", ActionNode::alias(["landing"]))
            .with("landing", record(&trace, "landing"));
        let tree = ActionTree::new()
            .with("_prelude", record(&trace, "root-pre"))
            .with("child", ActionNode::subtree(child));
        dispatch(
            &tree,
            &mut ctx(),
            DispatchPath::from_segments(["child", "jump"]),
        )
        .unwrap();
        // The alias restarts the child tree only: the root prelude does
        // not run a second time, the child prelude does.
        assert_eq!(
            taken(&trace),
            ["root-pre", "child-pre", "child-pre", "landing"]
        );
    }

    #[test]
    fn terminal_reads_trailing_arguments_by_reference() {
        let seen: Trace = Default::default();
        let child = ActionTree::new().with("write", {
            let seen = seen.clone();
            ActionNode::terminal(move |_, _, path| {
                while let Some(arg) = path.pop_front() {
                    seen.lock().unwrap().push(arg);
                }
                Ok(())
            })
        });
        let tree = ActionTree::new().with("content", ActionNode::subtree(child));
        let end = dispatch(
            &tree,
            &mut ctx(),
            DispatchPath::from_request_path("/content/write/42"),
        )
        .unwrap();
        assert!(matches!(end, WalkEnd::Done));
        assert_eq!(taken(&seen), ["42"]);
    }

    #[test]
    fn redirect_cycle_is_cut_off() {
        let tree = ActionTree::new()
            .with("a", ActionNode::alias(["b"]))
            .with("b", ActionNode::alias(["a"]));
        let err = dispatch(&tree, &mut ctx(), DispatchPath::from_segments(["a"]));
        assert!(matches!(err, Err(DispatchError::App(_))));
    }

    #[test]
    fn application_error_is_opaque_and_fatal() {
        let tree = ActionTree::new()
            .with("boom", ActionNode::terminal(|_, _, _| Err(Interrupt::app("database gone"))))
            .with("_notfound", ActionNode::terminal(|_, _, _| Ok(())));
        let err = dispatch(&tree, &mut ctx(), DispatchPath::from_segments(["boom"]));
        // _notfound does not catch application failures.
        assert!(matches!(err, Err(DispatchError::App(_))));
    }
}
