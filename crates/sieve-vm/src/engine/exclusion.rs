//! Exclusion composition.
//!
//! An `Exclusion` state runs its accepted operand and its excluded operand
//! side by side from every position it is activated at. A completion of the
//! accepted run fires the continuation unless the excluded run completes at
//! the same step.
//!
//! Operand runs are frontiers of their own, rooted at the operand subgraphs.
//! Activations are kept in groups keyed by the state of their excluded run.
//! Two activations whose excluded runs are equal will be blocked at exactly
//! the same future positions, so their accepted runs can be unioned. Runs
//! with different excluded states are never mixed, which keeps one
//! activation's forbidden span from blocking another's.

use sieve_compiler::{Graph, State};

use super::frontier::{Frontier, Key, Thread, ThreadKind};
use super::path::Path;
use super::simulation::{At, Item, Simulation};
use super::trace::Tracer;

pub(crate) struct Group {
    pub(crate) accept: Frontier,
    pub(crate) reject: Frontier,
}

impl Group {
    /// Adds `group` to `groups`, unioning it into a group with an equal
    /// excluded run if there is one.
    pub(crate) fn absorb_into(groups: &mut Vec<Group>, group: Group) {
        match groups.iter_mut().find(|existing| existing.reject == group.reject) {
            Some(existing) => existing.accept.union(group.accept),
            None => groups.push(group),
        }
    }
}

impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        self.accept == other.accept && self.reject == other.reject
    }
}

impl<E: 'static, T: Tracer> Simulation<'_, E, T> {
    /// Activates the exclusion at `key`, reached by `item`.
    pub(super) fn exclude(
        &mut self,
        graph: &Graph<E>,
        key: Key,
        item: &Item,
        into: &mut Frontier,
        at: At,
        work: &mut Vec<Item>,
    ) {
        let State::Exclusion {
            accept,
            reject,
            next,
        } = *graph.state(key.state)
        else {
            return;
        };

        let accept_graph = graph.subgraph(accept);
        let reject_graph = graph.subgraph(reject);
        let mut group = Group {
            accept: Frontier::new(),
            reject: Frontier::new(),
        };
        let entry = Item::root(accept_graph.entry(), item.path.clone());
        self.seed(accept_graph, &mut group.accept, entry, at.deeper());
        let entry = Item::root(reject_graph.entry(), Path::default());
        self.seed(reject_graph, &mut group.reject, entry, at.deeper());

        let accepted = self.settle(&mut group, at.position);
        if !group.accept.is_empty() {
            into.merge(key, Thread::exclusion(item.frame.clone(), vec![group]));
        }
        if let Some(done) = accepted {
            work.push(Item {
                ctx: key.ctx,
                state: next,
                frame: item.frame.clone(),
                path: done,
            });
        }
    }

    /// Steps every group of the exclusion `thread` at `key`. `graph` is the
    /// graph `key` belongs to and `local` the root graph of `out`.
    #[allow(clippy::too_many_arguments)]
    pub(super) fn step_exclusion(
        &mut self,
        local: &Graph<E>,
        graph: &Graph<E>,
        key: Key,
        thread: Thread,
        element: &E,
        at: At,
        out: &mut Frontier,
    ) {
        let State::Exclusion {
            accept,
            reject,
            next,
        } = *graph.state(key.state)
        else {
            return;
        };
        let ThreadKind::Exclusion(groups) = thread.kind else {
            return;
        };

        let accept_graph = graph.subgraph(accept);
        let reject_graph = graph.subgraph(reject);
        let mut kept = Vec::new();
        let mut accepted = None;

        for group in groups {
            let mut group = Group {
                accept: self.step(accept_graph, group.accept, element, at.deeper()),
                reject: self.step(reject_graph, group.reject, element, at.deeper()),
            };
            if let Some(done) = self.settle(&mut group, at.position + 1) {
                accepted.get_or_insert(done);
            }
            if !group.accept.is_empty() {
                Group::absorb_into(&mut kept, group);
            }
        }

        if !kept.is_empty() {
            out.merge(key, Thread::exclusion(thread.frame.clone(), kept));
        }
        if let Some(done) = accepted {
            let item = Item {
                ctx: key.ctx,
                state: next,
                frame: thread.frame,
                path: done,
            };
            self.seed(local, out, item, at.advance());
        }
    }

    /// Removes completions from both runs of `group`. Returns the accepted
    /// path unless the excluded run completed too.
    fn settle(&mut self, group: &mut Group, position: usize) -> Option<Path> {
        let blocked = group.reject.take_match().is_some();
        let done = group.accept.take_match()?;
        if blocked {
            self.tracer.trace_excluded(position);
            return None;
        }
        Some(done)
    }
}
