//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

pub(crate) fn ensure_choices(count: usize) {
    if count == 0 {
        panic!("Fragment::alt: alternation needs at least one choice");
    }
}
