//! Flyweight store of compiled rules.
//!
//! Each distinct rule value maps to exactly one `CompiledSymbol`. The entry
//! is inserted before its definition is ever looked at, so a rule that
//! refers to itself resolves to its own (not yet compiled) entry. The
//! definition is compiled lazily, once, the first time a matcher needs it.
//!
//! The map lock is only held for lookup-or-insert. Compilation happens
//! outside it and only interns, so it never waits on another entry.

use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;
use sieve_core::{ExpressionClass, Symbol, SymbolHandle};

use crate::compile::Compiler;
use crate::graph::Graph;
use crate::invariants::ensure_symbol;

/// Stable index of a cache entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(u32);

impl SymbolId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A cached rule and its lazily built graph.
pub struct CompiledSymbol<E> {
    id: SymbolId,
    handle: SymbolHandle<E>,
    name: Arc<str>,
    compiled: OnceLock<Compiled<E>>,
}

struct Compiled<E> {
    graph: Graph<E>,
    class: ExpressionClass,
}

impl<E: 'static> CompiledSymbol<E> {
    fn new(id: SymbolId, handle: SymbolHandle<E>) -> Self {
        Self {
            id,
            name: Arc::from(handle.name()),
            handle,
            compiled: OnceLock::new(),
        }
    }

    pub fn id(&self) -> SymbolId {
        self.id
    }

    pub fn handle(&self) -> &SymbolHandle<E> {
        &self.handle
    }

    pub fn name(&self) -> &Arc<str> {
        &self.name
    }

    /// The rule's graph, compiled on first call.
    ///
    /// `symbols` must be the cache this entry belongs to; rules named by the
    /// definition are interned there.
    pub fn graph(&self, symbols: &SymbolCache<E>) -> &Graph<E> {
        &self.compiled(symbols).graph
    }

    pub fn class(&self, symbols: &SymbolCache<E>) -> ExpressionClass {
        self.compiled(symbols).class
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled.get().is_some()
    }

    fn compiled(&self, symbols: &SymbolCache<E>) -> &Compiled<E> {
        self.compiled.get_or_init(|| {
            let definition = self.handle.definition();
            Compiled {
                class: definition.class(),
                graph: Compiler::build(symbols, &definition),
            }
        })
    }
}

type Entries<E> = IndexMap<SymbolHandle<E>, Arc<CompiledSymbol<E>>>;

/// Shared symbol cache. Clones refer to the same store.
pub struct SymbolCache<E> {
    entries: Arc<RwLock<Entries<E>>>,
}

impl<E: 'static> SymbolCache<E> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    /// Returns the id of `handle`'s entry, inserting an uncompiled entry if
    /// this rule value has not been seen.
    pub fn intern(&self, handle: &SymbolHandle<E>) -> SymbolId {
        self.entry(handle).id
    }

    /// Lookup-or-insert. Concurrent first use of equal rules yields one entry.
    pub fn entry(&self, handle: &SymbolHandle<E>) -> Arc<CompiledSymbol<E>> {
        if let Some(found) = self.read().get(handle) {
            return Arc::clone(found);
        }

        let mut entries = self.write();
        let id = SymbolId(entries.len() as u32);
        let entry = entries
            .entry(handle.clone())
            .or_insert_with(|| Arc::new(CompiledSymbol::new(id, handle.clone())));
        Arc::clone(entry)
    }

    /// # Panics
    ///
    /// Panics if `id` was not produced by this cache.
    pub fn get(&self, id: SymbolId) -> Arc<CompiledSymbol<E>> {
        let entries = self.read();
        let found = entries.get_index(id.index()).map(|(_, entry)| Arc::clone(entry));
        ensure_symbol(found, id)
    }

    /// Interns `rule` and compiles its graph.
    pub fn compile<S: Symbol<E>>(&self, rule: S) -> Arc<CompiledSymbol<E>> {
        let entry = self.entry(&SymbolHandle::new(rule));
        entry.graph(self);
        entry
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// True if both handles refer to the same store.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }

    fn read(&self) -> RwLockReadGuard<'_, Entries<E>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Entries<E>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E: 'static> Default for SymbolCache<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for SymbolCache<E> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<E> fmt::Debug for SymbolCache<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_list()
            .entries(entries.values().map(|entry| &entry.name))
            .finish()
    }
}
