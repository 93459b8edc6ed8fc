//! Element predicates.
//!
//! An atom decides whether a single input element is accepted. Atoms must
//! be pure and total: the engine may test the same element against the same
//! atom any number of times.

use std::fmt;
use std::sync::Arc;

/// Matches a single input element.
pub trait Atom<E>: fmt::Debug + Send + Sync {
    fn matches(&self, element: &E) -> bool;
}

/// Shared, type-erased atom as stored in fragments and compiled graphs.
pub type AtomRef<E> = Arc<dyn Atom<E>>;

/// Accepts exactly one element value.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Exact<E>(pub E);

impl<E> Atom<E> for Exact<E>
where
    E: PartialEq + fmt::Debug + Send + Sync,
{
    fn matches(&self, element: &E) -> bool {
        self.0 == *element
    }
}

impl<E: fmt::Debug> fmt::Debug for Exact<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Accepts any element in the inclusive range `lo..=hi`.
///
/// An inverted range accepts nothing.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Range<E> {
    pub lo: E,
    pub hi: E,
}

impl<E> Range<E> {
    pub fn new(lo: E, hi: E) -> Self {
        Self { lo, hi }
    }
}

impl<E> Atom<E> for Range<E>
where
    E: PartialOrd + fmt::Debug + Send + Sync,
{
    fn matches(&self, element: &E) -> bool {
        self.lo <= *element && *element <= self.hi
    }
}

impl<E: fmt::Debug> fmt::Debug for Range<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}..={:?}", self.lo, self.hi)
    }
}

/// Accepts every element.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Any;

impl<E> Atom<E> for Any {
    fn matches(&self, _element: &E) -> bool {
        true
    }
}

impl fmt::Debug for Any {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(".")
    }
}

/// Named element test backed by a plain function.
///
/// The name is what graph dumps and fragment `Debug` output show.
pub struct Predicate<E> {
    name: &'static str,
    test: fn(&E) -> bool,
}

impl<E> Predicate<E> {
    pub fn new(name: &'static str, test: fn(&E) -> bool) -> Self {
        Self { name, test }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<E> Clone for Predicate<E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            test: self.test,
        }
    }
}

impl<E> Atom<E> for Predicate<E> {
    fn matches(&self, element: &E) -> bool {
        (self.test)(element)
    }
}

impl<E> fmt::Debug for Predicate<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
