//! Named rules.
//!
//! A rule is any value implementing `Symbol`: its type plus its structural
//! `Hash`/`Eq` identify it. Two equal values of the same rule type are the
//! same rule, no matter where they were constructed. Rules may refer to
//! themselves (directly or through other rules) from their definition.

use std::any::{self, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::fragment::{ExpressionClass, Fragment};

/// A named, possibly self-referential rule.
///
/// ```
/// use sieve_core::{Fragment, Symbol};
///
/// #[derive(Hash, PartialEq, Eq)]
/// struct Digits;
///
/// impl Symbol<char> for Digits {
///     fn definition(&self) -> Fragment<char> {
///         Fragment::cat([Fragment::range('0', '9'), Fragment::symbol(Digits).optional()])
///     }
/// }
///
/// assert_eq!(Digits.name(), "Digits");
/// ```
pub trait Symbol<E>: Hash + Eq + Send + Sync + 'static {
    /// The rule body. A symbol cache calls it at most once; `class` may
    /// call it again.
    fn definition(&self) -> Fragment<E>;

    /// Display name used in traces and dumps. Defaults to the type name.
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed(short_type_name(any::type_name::<Self>()))
    }

    fn class(&self) -> ExpressionClass {
        self.definition().class()
    }
}

/// Strips the module path (and any generic arguments) from a type name.
fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

trait ErasedSymbol<E>: Send + Sync {
    fn as_any(&self) -> &dyn any::Any;
    fn dyn_eq(&self, other: &dyn ErasedSymbol<E>) -> bool;
    fn dyn_hash(&self, state: &mut dyn Hasher);
    fn name(&self) -> Cow<'static, str>;
    fn definition(&self) -> Fragment<E>;
    fn class(&self) -> ExpressionClass;
}

impl<E, S: Symbol<E>> ErasedSymbol<E> for S {
    fn as_any(&self) -> &dyn any::Any {
        self
    }

    fn dyn_eq(&self, other: &dyn ErasedSymbol<E>) -> bool {
        other.as_any().downcast_ref::<S>().is_some_and(|other| self == other)
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        TypeId::of::<S>().hash(&mut state);
        self.hash(&mut state);
    }

    fn name(&self) -> Cow<'static, str> {
        <S as Symbol<E>>::name(self)
    }

    fn definition(&self) -> Fragment<E> {
        <S as Symbol<E>>::definition(self)
    }

    fn class(&self) -> ExpressionClass {
        <S as Symbol<E>>::class(self)
    }
}

/// Type-erased reference to a rule value.
///
/// Hashing and equality follow the rule's type and value, so handles work
/// as keys of a symbol cache.
pub struct SymbolHandle<E>(Arc<dyn ErasedSymbol<E>>);

impl<E> SymbolHandle<E> {
    pub fn new<S: Symbol<E>>(rule: S) -> Self {
        Self(Arc::new(rule))
    }

    pub fn name(&self) -> Cow<'static, str> {
        self.0.name()
    }

    pub fn definition(&self) -> Fragment<E> {
        self.0.definition()
    }

    pub fn class(&self) -> ExpressionClass {
        self.0.class()
    }

    /// Downcasts to the concrete rule, if it has type `S`.
    pub fn rule<S: Symbol<E>>(&self) -> Option<&S> {
        self.0.as_any().downcast_ref()
    }
}

impl<E> Clone for SymbolHandle<E> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<E> PartialEq for SymbolHandle<E> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.dyn_eq(&*other.0)
    }
}

impl<E> Eq for SymbolHandle<E> {}

impl<E> Hash for SymbolHandle<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.dyn_hash(state);
    }
}

impl<E> fmt::Debug for SymbolHandle<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.name())
    }
}
