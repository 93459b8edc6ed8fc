//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::cache::SymbolId;

pub(crate) fn ensure_symbol<T>(entry: Option<T>, id: SymbolId) -> T {
    entry.unwrap_or_else(|| {
        panic!("SymbolCache: symbol {id} not found (id must come from the same cache)")
    })
}
