//! Sieve: streaming pattern matching over arbitrary element sequences.
//!
//! Patterns are built from `Fragment` constructors over caller-defined
//! atoms. Named rules implement `Symbol` and may refer to themselves; each
//! distinct rule compiles once into a shared `SymbolCache`.
//!
//! # Example
//!
//! ```
//! use sieve_lib::prelude::*;
//!
//! #[derive(Hash, PartialEq, Eq)]
//! struct Digits;
//!
//! impl Symbol<char> for Digits {
//!     fn definition(&self) -> Fragment<char> {
//!         Fragment::range('0', '9').one_or_more()
//!     }
//! }
//!
//! let version = Pattern::new(Fragment::cat([
//!     Fragment::symbol(Digits),
//!     Fragment::exact('.'),
//!     Fragment::symbol(Digits),
//! ]));
//!
//! assert!(version.matches("1.75".chars()));
//! assert!(!version.matches("1.".chars()));
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod pattern;

#[cfg(test)]
mod scenarios_tests;

pub use pattern::Pattern;

pub use sieve_compiler::{Automaton, GraphPrinter, SymbolCache, SymbolId};
pub use sieve_core::{Any, Atom, AtomRef, Exact, ExpressionClass, Fragment, Predicate, Range, Symbol};
pub use sieve_vm::{
    Limits, MatchPath, Matcher, MatcherBuilder, NoopTracer, Outcome, PrintTracer, RuntimeError,
    Segment, StepStatus, Stepper, Tracer, Verbosity,
};

/// The types most patterns need.
pub mod prelude {
    pub use crate::Pattern;
    pub use sieve_compiler::{Automaton, SymbolCache};
    pub use sieve_core::{Atom, Fragment, Symbol};
    pub use sieve_vm::{Matcher, Outcome};
}
