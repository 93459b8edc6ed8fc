//! Fragment → Graph compilation.
//!
//! Compilation runs in continuation-passing order: each fragment is
//! compiled with the state that follows it already known, so no exit
//! patching is needed except for loop heads.

use std::sync::Arc;

use sieve_core::Fragment;

use crate::cache::SymbolCache;
use crate::graph::{DEAD, Graph, MATCH, State, StateId};

pub(crate) struct Compiler<'c, E> {
    symbols: &'c SymbolCache<E>,
    states: Vec<State<E>>,
    subgraphs: Vec<Graph<E>>,
}

impl<'c, E: 'static> Compiler<'c, E> {
    fn new(symbols: &'c SymbolCache<E>) -> Self {
        Self {
            symbols,
            states: vec![State::Match, State::Dead],
            subgraphs: Vec::new(),
        }
    }

    /// Compiles `fragment` into a standalone graph ending in `MATCH`.
    ///
    /// Named rules are interned but their definitions are not compiled, so
    /// building a rule's own graph never re-enters the cache entry for it.
    pub(crate) fn build(symbols: &'c SymbolCache<E>, fragment: &Fragment<E>) -> Graph<E> {
        let mut compiler = Self::new(symbols);
        let entry = compiler.compile(fragment, MATCH);
        Graph::new(compiler.states, entry, compiler.subgraphs)
    }

    fn add(&mut self, state: State<E>) -> StateId {
        let id = self.states.len() as StateId;
        self.states.push(state);
        id
    }

    /// Compiles `fragment` so that it continues at `next`, returning its entry.
    fn compile(&mut self, fragment: &Fragment<E>, next: StateId) -> StateId {
        match fragment {
            Fragment::Never => DEAD,
            Fragment::Terminal(atom) => self.add(State::Consuming {
                atom: Arc::clone(atom),
                next,
            }),
            Fragment::Nonterminal(handle) => {
                let symbol = self.symbols.intern(handle);
                self.add(State::Symbolic { symbol, next })
            }
            Fragment::Catenation(parts) => parts
                .iter()
                .rev()
                .fold(next, |next, part| self.compile(part, next)),
            Fragment::Alternation(choices) => self.alternation(choices, next),
            Fragment::ZeroOrOne(inner) => {
                let first = self.compile(inner, next);
                self.add(State::Branch {
                    first,
                    second: next,
                })
            }
            Fragment::ZeroOrMore(inner) => self.repetition(inner, next).0,
            Fragment::OneOrMore(inner) => self.repetition(inner, next).1,
            Fragment::Exclusion(accept, reject) => {
                let accept = self.subgraph(accept);
                let reject = self.subgraph(reject);
                self.add(State::Exclusion {
                    accept,
                    reject,
                    next,
                })
            }
        }
    }

    /// Chain of branches, earlier choices preferred.
    fn alternation(&mut self, choices: &[Fragment<E>], next: StateId) -> StateId {
        let entries: Vec<_> = choices.iter().map(|c| self.compile(c, next)).collect();
        let Some((&last, rest)) = entries.split_last() else {
            return DEAD;
        };
        rest.iter().rev().fold(last, |second, &first| {
            self.add(State::Branch { first, second })
        })
    }

    /// Builds one loop for `inner` and returns `(head, body)`.
    ///
    /// Entering at the head gives `inner*`; entering at the body gives
    /// `inner+`. Both share the single compiled copy of `inner`.
    fn repetition(&mut self, inner: &Fragment<E>, next: StateId) -> (StateId, StateId) {
        let head = self.add(State::Branch {
            first: DEAD,
            second: next,
        });
        let body = self.compile(inner, head);
        if let State::Branch { first, .. } = &mut self.states[head as usize] {
            *first = body;
        }
        (head, body)
    }

    fn subgraph(&mut self, fragment: &Fragment<E>) -> u32 {
        let graph = Compiler::build(self.symbols, fragment);
        let index = self.subgraphs.len() as u32;
        self.subgraphs.push(graph);
        index
    }
}
