//! Compiled state graphs.
//!
//! States live in a flat vector and refer to each other by `StateId`. Every
//! graph reserves `MATCH` and `DEAD` at fixed indices. Dropping a graph
//! releases all of its states at once; nothing outside the arena points in.

use std::collections::HashSet;
use std::sync::OnceLock;

use sieve_core::{AtomRef, ExpressionClass, Fragment};

use crate::cache::{SymbolCache, SymbolId};
use crate::compile::Compiler;
use crate::dump::GraphPrinter;

/// Index into `Graph::states`.
pub type StateId = u32;

/// Accept sentinel.
pub const MATCH: StateId = 0;
/// Reject sentinel.
pub const DEAD: StateId = 1;

pub enum State<E> {
    Match,
    Dead,
    /// Consumes one element accepted by `atom`.
    Consuming { atom: AtomRef<E>, next: StateId },
    /// Epsilon fork. `first` is preferred over `second`.
    Branch { first: StateId, second: StateId },
    /// Runs the graph of a cached symbol, then continues at `next`.
    Symbolic { symbol: SymbolId, next: StateId },
    /// Runs two local subgraphs side by side; continues at `next` when
    /// `accept` completes and `reject` does not complete on the same span.
    Exclusion {
        accept: u32,
        reject: u32,
        next: StateId,
    },
}

impl<E> State<E> {
    /// True for states that appear in a resolved successor set.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, State::Dead | State::Branch { .. })
    }
}

/// An immutable compiled automaton fragment.
pub struct Graph<E> {
    states: Vec<State<E>>,
    entry: StateId,
    closures: Box<[OnceLock<Box<[StateId]>>]>,
    subgraphs: Vec<Graph<E>>,
}

impl<E> Graph<E> {
    pub(crate) fn new(states: Vec<State<E>>, entry: StateId, subgraphs: Vec<Graph<E>>) -> Self {
        let closures = states.iter().map(|_| OnceLock::new()).collect();
        Self {
            states,
            entry,
            closures,
            subgraphs,
        }
    }

    pub fn entry(&self) -> StateId {
        self.entry
    }

    pub fn state(&self, id: StateId) -> &State<E> {
        &self.states[id as usize]
    }

    /// Exclusion operand owned by this graph.
    pub fn subgraph(&self, index: u32) -> &Graph<E> {
        &self.subgraphs[index as usize]
    }

    pub fn subgraphs(&self) -> &[Graph<E>] {
        &self.subgraphs
    }

    /// Number of states, sentinels included.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Never true: sentinels are always present.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateId, &State<E>)> {
        self.states.iter().enumerate().map(|(i, s)| (i as StateId, s))
    }

    /// Resolved successor set of `id`: the non-epsilon states reachable
    /// through `Branch` chains, in preference order.
    ///
    /// Computed on first request and cached. Epsilon cycles are cut, and
    /// `DEAD` never appears in the result.
    pub fn resolve(&self, id: StateId) -> &[StateId] {
        self.closures[id as usize].get_or_init(|| self.closure(id))
    }

    fn closure(&self, id: StateId) -> Box<[StateId]> {
        let mut resolved = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![id];

        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            match self.state(current) {
                State::Dead => {}
                State::Branch { first, second } => {
                    stack.push(*second);
                    stack.push(*first);
                }
                _ => resolved.push(current),
            }
        }

        resolved.into_boxed_slice()
    }
}

/// A compiled top-level expression bound to the cache its symbols live in.
pub struct Automaton<E> {
    graph: Graph<E>,
    symbols: SymbolCache<E>,
    class: ExpressionClass,
}

impl<E: 'static> Automaton<E> {
    /// Compiles `fragment`, interning any rules it names into `symbols`.
    ///
    /// Rule graphs are not built here. They compile on first use during
    /// matching and stay in the cache.
    pub fn compile(fragment: &Fragment<E>, symbols: &SymbolCache<E>) -> Self {
        Self {
            graph: Compiler::build(symbols, fragment),
            symbols: symbols.clone(),
            class: fragment.class(),
        }
    }

    pub fn graph(&self) -> &Graph<E> {
        &self.graph
    }

    pub fn symbols(&self) -> &SymbolCache<E> {
        &self.symbols
    }

    pub fn class(&self) -> ExpressionClass {
        self.class
    }

    pub fn state_count(&self) -> usize {
        self.graph.len()
    }

    pub fn dump(&self) -> String {
        GraphPrinter::new(&self.graph).symbols(&self.symbols).dump()
    }
}
