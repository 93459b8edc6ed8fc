//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use sieve_compiler::StateId;

pub(crate) fn ensure_same_kind(state: StateId) -> ! {
    panic!("Frontier: threads for S{state} disagree on kind (state ids must come from one graph)")
}

pub(crate) fn ensure_plain(state: StateId) -> ! {
    panic!("Frontier: S{state} must hold a plain thread")
}
