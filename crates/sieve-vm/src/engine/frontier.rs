//! Sets of live states.
//!
//! A frontier belongs to one position and one root graph. Threads are keyed
//! by the graph they run in, their state, and the call they belong to, and
//! a key holds at most one thread. Threads that arrive at a key already
//! present are merged into it: the first arrival keeps its path, and
//! exclusion groups are unioned.
//!
//! Every key activated at the frontier's position is remembered, so seeding
//! the same key twice is a no-op even after its thread has moved on.

use std::collections::HashSet;
use std::rc::Rc;

use indexmap::IndexMap;
use indexmap::map::Entry;
use sieve_compiler::{MATCH, StateId, SymbolId};

use super::exclusion::Group;
use super::path::Path;
use super::stack::{CallSet, Frame, FrameId};
use crate::invariants::{ensure_plain, ensure_same_kind};

/// Graph a thread runs in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Ctx {
    /// The frontier's own graph: the top-level graph or an exclusion operand.
    Local,
    /// A rule's graph.
    Rule(SymbolId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Key {
    pub(crate) ctx: Ctx,
    pub(crate) state: StateId,
    pub(crate) frame: Option<FrameId>,
}

impl Key {
    /// Accepting key of the frontier's own graph.
    pub(crate) const ACCEPT: Key = Key {
        ctx: Ctx::Local,
        state: MATCH,
        frame: None,
    };

    pub(crate) fn new(ctx: Ctx, state: StateId, frame: Option<&Frame>) -> Self {
        Self {
            ctx,
            state,
            frame: frame.map(Frame::id),
        }
    }
}

#[derive(Default)]
pub(crate) struct Frontier {
    threads: IndexMap<Key, Thread>,
    visited: HashSet<Key>,
    /// Rule calls started at this frontier's position.
    calls: Option<Rc<CallSet>>,
}

pub(crate) struct Thread {
    /// Call this thread completes into, `None` at the root.
    pub(crate) frame: Option<Frame>,
    pub(crate) kind: ThreadKind,
}

pub(crate) enum ThreadKind {
    /// Waiting at a `Consuming` state, or accepted at `MATCH`.
    Plain(Path),
    /// Running an exclusion; one group per distinct excluded-operand state.
    Exclusion(Vec<Group>),
}

impl Thread {
    pub(crate) fn plain(frame: Option<Frame>, path: Path) -> Self {
        Self {
            frame,
            kind: ThreadKind::Plain(path),
        }
    }

    pub(crate) fn exclusion(frame: Option<Frame>, groups: Vec<Group>) -> Self {
        Self {
            frame,
            kind: ThreadKind::Exclusion(groups),
        }
    }

    fn absorb(&mut self, key: Key, other: Thread) {
        match (&mut self.kind, other.kind) {
            (ThreadKind::Plain(_), ThreadKind::Plain(_)) => {}
            (ThreadKind::Exclusion(groups), ThreadKind::Exclusion(others)) => {
                for group in others {
                    Group::absorb_into(groups, group);
                }
            }
            _ => ensure_same_kind(key.state),
        }
    }
}

impl Frontier {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.threads.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    pub(crate) fn contains_match(&self) -> bool {
        self.threads.contains_key(&Key::ACCEPT)
    }

    /// True when no thread can consume another element.
    pub(crate) fn is_exhausted(&self) -> bool {
        self.threads.keys().all(|&key| key == Key::ACCEPT)
    }

    /// Marks `key` as activated at this position. Returns false if it
    /// already was.
    pub(crate) fn visit(&mut self, key: Key) -> bool {
        self.visited.insert(key)
    }

    /// Call set for this position, created on first use.
    pub(crate) fn calls(&mut self, make: impl FnOnce() -> Rc<CallSet>) -> Rc<CallSet> {
        Rc::clone(self.calls.get_or_insert_with(make))
    }

    /// Path of the accepting thread, if any.
    pub(crate) fn match_path(&self) -> Option<&Path> {
        self.threads.get(&Key::ACCEPT).map(|thread| match &thread.kind {
            ThreadKind::Plain(path) => path,
            ThreadKind::Exclusion(_) => ensure_plain(MATCH),
        })
    }

    /// Removes the accepting thread and returns its path.
    pub(crate) fn take_match(&mut self) -> Option<Path> {
        let thread = self.threads.shift_remove(&Key::ACCEPT)?;
        match thread.kind {
            ThreadKind::Plain(path) => Some(path),
            ThreadKind::Exclusion(_) => ensure_plain(MATCH),
        }
    }

    /// Adds a plain thread unless `key` is already live.
    pub(crate) fn insert_plain(&mut self, key: Key, frame: Option<Frame>, path: Path) {
        self.threads
            .entry(key)
            .or_insert_with(|| Thread::plain(frame, path));
    }

    pub(crate) fn merge(&mut self, key: Key, thread: Thread) {
        match self.threads.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(thread);
            }
            Entry::Occupied(mut slot) => slot.get_mut().absorb(key, thread),
        }
    }

    pub(crate) fn union(&mut self, other: Frontier) {
        for (key, thread) in other.threads {
            self.merge(key, thread);
        }
    }

    /// Total number of threads, exclusion operands included.
    pub(crate) fn weight(&self) -> usize {
        self.threads
            .values()
            .map(|thread| {
                1 + match &thread.kind {
                    ThreadKind::Plain(_) => 0,
                    ThreadKind::Exclusion(groups) => groups
                        .iter()
                        .map(|group| group.accept.weight() + group.reject.weight())
                        .sum::<usize>(),
                }
            })
            .sum()
    }

    pub(crate) fn into_threads(self) -> impl Iterator<Item = (Key, Thread)> {
        self.threads.into_iter()
    }
}

/// Structural equality: same keys with equal exclusion groups. Paths and
/// activation history are ignored.
impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.threads == other.threads
    }
}

impl PartialEq for Thread {
    fn eq(&self, other: &Self) -> bool {
        match (&self.kind, &other.kind) {
            (ThreadKind::Plain(_), ThreadKind::Plain(_)) => true,
            (ThreadKind::Exclusion(left), ThreadKind::Exclusion(right)) => left == right,
            _ => false,
        }
    }
}
