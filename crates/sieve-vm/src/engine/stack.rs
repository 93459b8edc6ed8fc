//! Graph-structured call stack.
//!
//! Rule calls do not nest frontiers. A thread running inside a rule carries
//! a `Frame` naming the call it belongs to, and the call records where each
//! caller continues once the rule completes. All calls of one rule at one
//! position of one frontier share a single node, so a call that arrives
//! while the rule is already being entered there (left recursion) only adds
//! its continuation, and every completion resumes every caller.
//!
//! Nodes started at the same position live in one `CallSet`. Continuations
//! into the same set are stored by index and continuations into earlier sets
//! by reference, so sets form an acyclic graph that is released as soon as
//! no thread can complete into it.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use indexmap::IndexMap;
use sieve_compiler::{StateId, SymbolId};

use super::frontier::Ctx;
use super::path::Path;

/// Calls started at one position of one frontier.
pub(crate) struct CallSet {
    serial: u64,
    position: usize,
    nodes: RefCell<IndexMap<SymbolId, Node>>,
}

struct Node {
    name: Arc<str>,
    /// Nesting height at creation, counted from the frontier's root.
    height: u32,
    returns: Vec<Return>,
    /// Path of the first completion at the call position. Callers joining
    /// later at that position resume from it.
    completed: Option<Path>,
}

struct Return {
    ctx: Ctx,
    next: StateId,
    caller: Caller,
}

enum Caller {
    /// The caller runs at the frontier's root.
    Root,
    /// A call in the same set, by index.
    Sibling(u32),
    /// A call in an earlier set.
    Outer(Frame),
}

/// Where a caller resumes after a call completes.
pub(crate) struct Continuation {
    pub(crate) ctx: Ctx,
    pub(crate) next: StateId,
    pub(crate) frame: Option<Frame>,
}

/// Handle to one call node.
#[derive(Clone)]
pub(crate) struct Frame {
    set: Rc<CallSet>,
    index: u32,
}

/// Identity of a call node, stable for the lifetime of its set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct FrameId {
    pub(crate) set: u64,
    pub(crate) index: u32,
}

impl CallSet {
    pub(crate) fn new(serial: u64, position: usize) -> Rc<Self> {
        Rc::new(Self {
            serial,
            position,
            nodes: RefCell::new(IndexMap::new()),
        })
    }
}

impl Frame {
    /// The call of `symbol` already started in `set`, if any.
    pub(crate) fn find(set: &Rc<CallSet>, symbol: SymbolId) -> Option<Frame> {
        let index = set.nodes.borrow().get_index_of(&symbol)?;
        Some(Frame {
            set: Rc::clone(set),
            index: index as u32,
        })
    }

    /// Starts a call of `symbol` in `set`.
    pub(crate) fn open(set: &Rc<CallSet>, symbol: SymbolId, name: Arc<str>, height: u32) -> Frame {
        let (index, _) = set.nodes.borrow_mut().insert_full(
            symbol,
            Node {
                name,
                height,
                returns: Vec::new(),
                completed: None,
            },
        );
        Frame {
            set: Rc::clone(set),
            index: index as u32,
        }
    }

    pub(crate) fn id(&self) -> FrameId {
        FrameId {
            set: self.set.serial,
            index: self.index,
        }
    }

    /// Position the call started at.
    pub(crate) fn start(&self) -> usize {
        self.set.position
    }

    pub(crate) fn name(&self) -> Arc<str> {
        self.with_node(|node| Arc::clone(&node.name))
    }

    pub(crate) fn height(&self) -> u32 {
        self.with_node(|node| node.height)
    }

    /// Registers a caller that resumes at `next` in `ctx`. Returns the path of
    /// a completion already recorded at the call position, which the new
    /// caller must resume from immediately.
    pub(crate) fn add_return(&self, ctx: Ctx, next: StateId, caller: Option<&Frame>) -> Option<Path> {
        let caller = match caller {
            None => Caller::Root,
            Some(frame) if Rc::ptr_eq(&frame.set, &self.set) => Caller::Sibling(frame.index),
            Some(frame) => Caller::Outer(frame.clone()),
        };
        self.with_node(|node| {
            node.returns.push(Return { ctx, next, caller });
            node.completed.clone()
        })
    }

    /// Records a completion at `position` and returns every caller's
    /// continuation, in registration order.
    pub(crate) fn complete(&self, path: &Path, position: usize) -> Vec<Continuation> {
        let set = &self.set;
        let at_start = position == set.position;
        self.with_node(|node| {
            if at_start && node.completed.is_none() {
                node.completed = Some(path.clone());
            }
            node.returns
                .iter()
                .map(|ret| Continuation {
                    ctx: ret.ctx,
                    next: ret.next,
                    frame: match &ret.caller {
                        Caller::Root => None,
                        Caller::Sibling(index) => Some(Frame {
                            set: Rc::clone(set),
                            index: *index,
                        }),
                        Caller::Outer(frame) => Some(frame.clone()),
                    },
                })
                .collect()
        })
    }

    fn with_node<R>(&self, f: impl FnOnce(&mut Node) -> R) -> R {
        let mut nodes = self.set.nodes.borrow_mut();
        f(&mut nodes[self.index as usize])
    }
}

// Release chains of outer sets iteratively; deep recursion builds long ones.
impl Drop for CallSet {
    fn drop(&mut self) {
        let mut pending = take_outer(self);
        while let Some(set) = pending.pop() {
            if let Ok(mut set) = Rc::try_unwrap(set) {
                pending.extend(take_outer(&mut set));
            }
        }
    }
}

fn take_outer(set: &mut CallSet) -> Vec<Rc<CallSet>> {
    set.nodes
        .get_mut()
        .values_mut()
        .flat_map(|node| node.returns.drain(..))
        .filter_map(|ret| match ret.caller {
            Caller::Outer(frame) => Some(frame.set),
            _ => None,
        })
        .collect()
}
