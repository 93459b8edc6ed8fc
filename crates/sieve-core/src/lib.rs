//! Core expression types for sieve.
//!
//! Three layers:
//! - **Atoms**: element predicates consumed one input element at a time
//! - **Fragments**: immutable expression trees over eight primitives
//! - **Symbols**: named, possibly self-referential rules reached through
//!   type-erased handles
//!
//! Fragments never recurse directly. A rule refers to itself through a
//! `SymbolHandle`, which the compiler resolves against a symbol cache.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod atom;
mod fragment;
mod invariants;
mod symbol;

#[cfg(test)]
mod fragment_tests;
#[cfg(test)]
mod symbol_tests;

pub use atom::{Any, Atom, AtomRef, Exact, Predicate, Range};
pub use fragment::{ExpressionClass, Fragment};
pub use symbol::{Symbol, SymbolHandle};
