//! State graph construction for sieve expressions.
//!
//! ```text
//! Fragment → Compiler → Graph ─┬─ Automaton (per attempt)
//!                              └─ CompiledSymbol (shared, in SymbolCache)
//! ```
//!
//! Graphs are arenas of states addressed by `StateId`. Named rules are not
//! inlined: a `Symbolic` state refers to a `SymbolCache` entry whose graph
//! is compiled once, on first use, and shared by every call site.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod cache;
mod compile;
mod dump;
mod graph;
mod invariants;


pub use cache::{CompiledSymbol, SymbolCache, SymbolId};
pub use dump::GraphPrinter;
pub use graph::{Automaton, DEAD, Graph, MATCH, State, StateId};
