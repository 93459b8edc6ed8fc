use std::borrow::Cow;
use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;

use crate::{ExpressionClass, Fragment, Symbol, SymbolHandle};

#[derive(Hash, PartialEq, Eq)]
struct Xs;

impl Symbol<char> for Xs {
    fn definition(&self) -> Fragment<char> {
        Fragment::cat([Fragment::exact('x'), Fragment::symbol(Xs).optional()])
    }
}

#[derive(Hash, PartialEq, Eq)]
struct Keyword(&'static str);

impl Symbol<char> for Keyword {
    fn definition(&self) -> Fragment<char> {
        Fragment::text(self.0)
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Owned(format!("kw:{}", self.0))
    }
}

#[derive(Hash, PartialEq, Eq)]
struct Repeat<T>(T);

impl Symbol<char> for Repeat<u8> {
    fn definition(&self) -> Fragment<char> {
        Fragment::any().times(self.0 as usize)
    }
}

#[test]
fn default_name_is_short_type_name() {
    assert_eq!(Xs.name(), "Xs");
    assert_eq!(Repeat(2u8).name(), "Repeat");
}

#[test]
fn custom_name() {
    assert_eq!(SymbolHandle::new(Keyword("if")).name(), "kw:if");
}

#[test]
fn recursive_definition_refers_to_itself() {
    insta::assert_snapshot!(format!("{:?}", Xs.definition()), @"('x' & <Xs>?)");
    assert_eq!(Xs.class(), ExpressionClass::ContextFree);
    assert_eq!(Keyword("if").class(), ExpressionClass::Regular);
}

#[test]
fn equal_values_are_equal_handles() {
    let first = SymbolHandle::new(Keyword("if"));
    let second = SymbolHandle::new(Keyword("if"));
    let hasher = RandomState::new();

    assert_eq!(first, second);
    assert_eq!(hasher.hash_one(&first), hasher.hash_one(&second));
}

#[test]
fn different_values_or_types_differ() {
    assert_ne!(SymbolHandle::new(Keyword("if")), SymbolHandle::new(Keyword("else")));
    assert_ne!(SymbolHandle::new(Xs), SymbolHandle::new(Keyword("x")));
}

#[test]
fn handle_downcasts_to_rule() {
    let handle = SymbolHandle::new(Keyword("while"));

    assert_eq!(handle.rule::<Keyword>().map(|kw| kw.0), Some("while"));
    assert!(handle.rule::<Xs>().is_none());
}

#[test]
fn handle_debug_shows_name() {
    insta::assert_snapshot!(format!("{:?}", SymbolHandle::new(Xs)), @"<Xs>");
}
