//! Expression IR.
//!
//! A `Fragment` is an immutable tree over eight primitives. Sub-fragments
//! are reference-counted, so cloning and composing is cheap and shares
//! structure. Recursion is only possible through `Nonterminal`.
//!
//! Sugar (optional, bounded repetition, literals) is canonicalized into the
//! primitives at construction time:
//!
//! ```text
//! x{2,5}   →  x & x & (x & (x & x?)?)?
//! x{0,}    →  x*
//! x{3,}    →  x & x & x+
//! ```

use std::collections::HashSet;
use std::fmt;
use std::iter;
use std::sync::Arc;

use crate::atom::{Any, Atom, AtomRef, Exact, Range};
use crate::invariants::ensure_choices;
use crate::symbol::{Symbol, SymbolHandle};

/// Expression tree over atoms of element type `E`.
pub enum Fragment<E> {
    /// Matches nothing.
    Never,
    /// Consumes one element accepted by the atom.
    Terminal(AtomRef<E>),
    /// Runs a named rule.
    Nonterminal(SymbolHandle<E>),
    /// Matches the parts in order. Empty catenation matches the empty input.
    Catenation(Arc<[Fragment<E>]>),
    /// Matches any one of the choices. Earlier choices are preferred.
    Alternation(Arc<[Fragment<E>]>),
    ZeroOrOne(Arc<Fragment<E>>),
    ZeroOrMore(Arc<Fragment<E>>),
    OneOrMore(Arc<Fragment<E>>),
    /// Matches what the first accepts unless the second accepts the same span.
    Exclusion(Arc<Fragment<E>>, Arc<Fragment<E>>),
}

/// How much machinery an expression needs.
///
/// Ordered so that the class of a composite is the maximum of its parts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExpressionClass {
    Regular,
    /// Contains at least one named rule.
    ContextFree,
    /// Contains at least one exclusion.
    Exclusive,
}

impl<E> Fragment<E> {
    pub fn never() -> Self {
        Self::Never
    }

    /// Matches the empty input.
    pub fn empty() -> Self {
        Self::Catenation(Arc::from(Vec::new()))
    }

    /// Catenation; a single part collapses to itself.
    pub fn cat(parts: impl IntoIterator<Item = Fragment<E>>) -> Self {
        let mut parts: Vec<_> = parts.into_iter().collect();
        if parts.len() == 1 {
            return parts.swap_remove(0);
        }
        Self::Catenation(parts.into())
    }

    /// Alternation; a single choice collapses to itself.
    ///
    /// # Panics
    ///
    /// Panics when `choices` is empty.
    pub fn alt(choices: impl IntoIterator<Item = Fragment<E>>) -> Self {
        let mut choices: Vec<_> = choices.into_iter().collect();
        ensure_choices(choices.len());
        if choices.len() == 1 {
            return choices.swap_remove(0);
        }
        Self::Alternation(choices.into())
    }

    pub fn optional(self) -> Self {
        Self::ZeroOrOne(Arc::new(self))
    }

    pub fn zero_or_more(self) -> Self {
        Self::ZeroOrMore(Arc::new(self))
    }

    pub fn one_or_more(self) -> Self {
        Self::OneOrMore(Arc::new(self))
    }

    /// Set difference: accepted by `self` but not by `excluded`.
    pub fn exclude(self, excluded: Fragment<E>) -> Self {
        Self::Exclusion(Arc::new(self), Arc::new(excluded))
    }

    /// Bounded or unbounded repetition, `max = None` meaning unbounded.
    ///
    /// Negative bounds clamp to zero, and bounds beyond `usize::MAX`
    /// saturate. An inverted range (`min > max` after clamping) matches
    /// exactly `min` copies.
    ///
    /// The result holds `min` copies plus a tail nested `max - min` deep, so
    /// its size grows linearly with both bounds. Prefer `None` over a huge
    /// `max`.
    pub fn repeat(&self, min: i64, max: Option<i64>) -> Self {
        let min = repeat_bound(min);

        let Some(max) = max else {
            if min == 0 {
                return self.clone().zero_or_more();
            }
            let forced = iter::repeat_n(self.clone(), min - 1);
            return Self::cat(forced.chain(iter::once(self.clone().one_or_more())));
        };

        let max = repeat_bound(max).max(min);
        let mut parts: Vec<_> = iter::repeat_n(self.clone(), min).collect();
        if let Some(tail) = self.optional_tail(max - min) {
            parts.push(tail);
        }
        Self::cat(parts)
    }

    /// Exactly `count` copies.
    pub fn times(&self, count: usize) -> Self {
        Self::cat(iter::repeat_n(self.clone(), count))
    }

    // x{0,n} as nested optionals: (x & (x & x?)?)?
    fn optional_tail(&self, len: usize) -> Option<Self> {
        if len == 0 {
            return None;
        }
        let mut tail = self.clone().optional();
        for _ in 1..len {
            tail = Self::cat([self.clone(), tail]).optional();
        }
        Some(tail)
    }

    /// The class of this expression, including the definitions of every rule
    /// it reaches.
    pub fn class(&self) -> ExpressionClass {
        self.class_within(&mut HashSet::new())
    }

    fn class_within(&self, expanded: &mut HashSet<SymbolHandle<E>>) -> ExpressionClass {
        match self {
            Self::Never | Self::Terminal(_) => ExpressionClass::Regular,
            // Each rule is expanded once; reaching it again adds nothing.
            Self::Nonterminal(handle) => {
                if !expanded.insert(handle.clone()) {
                    return ExpressionClass::ContextFree;
                }
                handle
                    .definition()
                    .class_within(expanded)
                    .max(ExpressionClass::ContextFree)
            }
            Self::Catenation(parts) | Self::Alternation(parts) => parts
                .iter()
                .map(|part| part.class_within(expanded))
                .max()
                .unwrap_or(ExpressionClass::Regular),
            Self::ZeroOrOne(inner) | Self::ZeroOrMore(inner) | Self::OneOrMore(inner) => {
                inner.class_within(expanded)
            }
            Self::Exclusion(..) => ExpressionClass::Exclusive,
        }
    }
}

pub(crate) fn repeat_bound(bound: i64) -> usize {
    usize::try_from(bound.max(0)).unwrap_or(usize::MAX)
}

impl<E: 'static> Fragment<E> {
    pub fn atom(atom: impl Atom<E> + 'static) -> Self {
        Self::Terminal(Arc::new(atom))
    }

    pub fn any() -> Self {
        Self::atom(Any)
    }

    pub fn symbol<S: Symbol<E>>(rule: S) -> Self {
        Self::Nonterminal(SymbolHandle::new(rule))
    }
}

impl<E> Fragment<E>
where
    E: PartialEq + fmt::Debug + Send + Sync + 'static,
{
    pub fn exact(element: E) -> Self {
        Self::atom(Exact(element))
    }

    /// Catenation of one exact atom per element.
    pub fn literal(elements: impl IntoIterator<Item = E>) -> Self {
        Self::cat(elements.into_iter().map(Self::exact))
    }
}

impl<E> Fragment<E>
where
    E: PartialOrd + fmt::Debug + Send + Sync + 'static,
{
    pub fn range(lo: E, hi: E) -> Self {
        Self::atom(Range::new(lo, hi))
    }
}

impl Fragment<char> {
    pub fn text(text: &str) -> Self {
        Self::literal(text.chars())
    }
}

impl<E> Clone for Fragment<E> {
    fn clone(&self) -> Self {
        match self {
            Self::Never => Self::Never,
            Self::Terminal(atom) => Self::Terminal(Arc::clone(atom)),
            Self::Nonterminal(handle) => Self::Nonterminal(handle.clone()),
            Self::Catenation(parts) => Self::Catenation(Arc::clone(parts)),
            Self::Alternation(choices) => Self::Alternation(Arc::clone(choices)),
            Self::ZeroOrOne(inner) => Self::ZeroOrOne(Arc::clone(inner)),
            Self::ZeroOrMore(inner) => Self::ZeroOrMore(Arc::clone(inner)),
            Self::OneOrMore(inner) => Self::OneOrMore(Arc::clone(inner)),
            Self::Exclusion(accept, reject) => {
                Self::Exclusion(Arc::clone(accept), Arc::clone(reject))
            }
        }
    }
}

impl<E> fmt::Debug for Fragment<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => f.write_str("∅"),
            Self::Terminal(atom) => write!(f, "{atom:?}"),
            Self::Nonterminal(handle) => write!(f, "{handle:?}"),
            Self::Catenation(parts) if parts.is_empty() => f.write_str("ε"),
            Self::Catenation(parts) => write_joined(f, parts, " & "),
            Self::Alternation(choices) => write_joined(f, choices, " | "),
            Self::ZeroOrOne(inner) => write!(f, "{inner:?}?"),
            Self::ZeroOrMore(inner) => write!(f, "{inner:?}*"),
            Self::OneOrMore(inner) => write!(f, "{inner:?}+"),
            Self::Exclusion(accept, reject) => write!(f, "({accept:?} ÷ {reject:?})"),
        }
    }
}

fn write_joined<E>(f: &mut fmt::Formatter<'_>, parts: &[Fragment<E>], sep: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{part:?}")?;
    }
    f.write_str(")")
}
