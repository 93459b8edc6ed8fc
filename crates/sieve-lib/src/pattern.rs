//! One-shot matching without managing automata.

use std::borrow::Borrow;
use std::fmt;

use sieve_compiler::{Automaton, SymbolCache};
use sieve_core::{ExpressionClass, Fragment};
use sieve_vm::{MatchPath, Matcher, Outcome};

/// A fragment paired with the cache its rules compile into.
///
/// Every query compiles a fresh top-level automaton and drops it when the
/// query returns. Rule graphs live in the cache and are built at most once,
/// so repeated queries only pay for the top-level expression. Compile once
/// with [`Pattern::compile`] and reuse a [`Matcher`] when that matters.
pub struct Pattern<E> {
    fragment: Fragment<E>,
    symbols: SymbolCache<E>,
}

impl<E: 'static> Pattern<E> {
    pub fn new(fragment: Fragment<E>) -> Self {
        Self::with_symbols(fragment, &SymbolCache::new())
    }

    /// Shares `symbols` with other patterns, so common rules compile once.
    pub fn with_symbols(fragment: Fragment<E>, symbols: &SymbolCache<E>) -> Self {
        Self {
            fragment,
            symbols: symbols.clone(),
        }
    }

    pub fn fragment(&self) -> &Fragment<E> {
        &self.fragment
    }

    pub fn symbols(&self) -> &SymbolCache<E> {
        &self.symbols
    }

    pub fn class(&self) -> ExpressionClass {
        self.fragment.class()
    }

    pub fn compile(&self) -> Automaton<E> {
        Automaton::compile(&self.fragment, &self.symbols)
    }

    pub fn matches<I>(&self, input: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<E>,
    {
        Matcher::new(&self.compile()).matches(input)
    }

    pub fn has_matching_prefix<I>(&self, input: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<E>,
    {
        Matcher::new(&self.compile()).has_matching_prefix(input)
    }

    pub fn longest_matching_prefix<'i>(&self, input: &'i [E]) -> Option<&'i [E]> {
        Matcher::new(&self.compile()).longest_matching_prefix(input)
    }

    pub fn match_path<I>(&self, input: I) -> Option<MatchPath>
    where
        I: IntoIterator,
        I::Item: Borrow<E>,
    {
        Matcher::new(&self.compile()).match_path(input)
    }

    pub fn run<I>(&self, input: I) -> Outcome
    where
        I: IntoIterator,
        I::Item: Borrow<E>,
    {
        Matcher::new(&self.compile()).run(input)
    }
}

impl<E> Clone for Pattern<E> {
    fn clone(&self) -> Self {
        Self {
            fragment: self.fragment.clone(),
            symbols: self.symbols.clone(),
        }
    }
}

impl<E> fmt::Debug for Pattern<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("fragment", &self.fragment)
            .field("symbols", &self.symbols)
            .finish()
    }
}
