use indoc::indoc;
use sieve_compiler::{Automaton, SymbolCache};
use sieve_core::{Fragment, Symbol};

use super::{Matcher, PrintTracer, Verbosity};

#[derive(Hash, PartialEq, Eq)]
struct Xs;

impl Symbol<char> for Xs {
    fn definition(&self) -> Fragment<char> {
        Fragment::cat([Fragment::exact('x'), Fragment::symbol(Xs).optional()])
    }
}

#[derive(Hash, PartialEq, Eq)]
struct Left;

impl Symbol<char> for Left {
    fn definition(&self) -> Fragment<char> {
        Fragment::alt([
            Fragment::cat([Fragment::symbol(Left), Fragment::exact('x')]),
            Fragment::exact('y'),
        ])
    }
}

#[derive(Hash, PartialEq, Eq)]
struct Balanced;

impl Symbol<char> for Balanced {
    fn definition(&self) -> Fragment<char> {
        Fragment::cat([
            Fragment::exact('('),
            Fragment::symbol(Balanced),
            Fragment::exact(')'),
        ])
        .zero_or_more()
    }
}

fn trace(fragment: &Fragment<char>, input: &str, verbosity: Verbosity) -> String {
    let automaton = Automaton::compile(fragment, &SymbolCache::new());
    let mut tracer = PrintTracer::new(verbosity);
    Matcher::new(&automaton).run_with(input.chars(), &mut tracer);
    tracer.dump()
}

#[test]
fn default_verbosity() {
    insta::assert_snapshot!(trace(&Fragment::text("ab"), "ab", Verbosity::Default), @r"
    accept @2
    exhausted @2
    ");
}

#[test]
fn very_verbose_adds_steps() {
    let expected = indoc! {"
        step @1: 1 live
        step @2: 1 live
        accept @2
        exhausted @2"};

    assert_eq!(
        trace(&Fragment::text("ab"), "ab", Verbosity::VeryVerbose),
        expected
    );
}

#[test]
fn verbose_adds_calls() {
    insta::assert_snapshot!(trace(&Fragment::symbol(Xs), "x", Verbosity::Verbose), @r"
    call <Xs> @0
    call <Xs> @1
    return <Xs> @1
    accept @1
    ");
}

#[test]
fn calls_hidden_at_default() {
    assert_eq!(
        trace(&Fragment::symbol(Xs), "x", Verbosity::Default),
        "accept @1"
    );
}

#[test]
fn excluded_completion() {
    let fragment = Fragment::exact('a').one_or_more().exclude(Fragment::text("aa"));

    insta::assert_snapshot!(trace(&fragment, "aa", Verbosity::Default), @r"
    accept @1
    excluded @2
    ");
}

#[test]
fn left_recursive_call_joins() {
    insta::assert_snapshot!(trace(&Fragment::symbol(Left), "yx", Verbosity::Verbose), @r"
    call <Left> @0
    join <Left> @0
    return <Left> @1
    accept @1
    return <Left> @2
    accept @2
    ");
}

#[test]
fn recursion_limit_reported() {
    let automaton = Automaton::compile(&Fragment::symbol(Balanced), &SymbolCache::new());
    let matcher = Matcher::builder(&automaton).recursion_limit(1).build();
    let mut tracer = PrintTracer::new(Verbosity::Default);

    let outcome = matcher.run_with("()".chars(), &mut tracer);

    assert!(outcome.truncated);
    assert!(!outcome.matched);
    insta::assert_snapshot!(tracer.dump(), @r"
    accept @0
    recursion limit <Balanced> at depth 2
    exhausted @1
    ");
}

#[test]
fn stepper_hands_back_tracer() {
    let automaton = Automaton::compile(&Fragment::exact('a'), &SymbolCache::new());
    let matcher = Matcher::new(&automaton);
    let mut stepper = matcher.stepper_with(PrintTracer::new(Verbosity::Default));

    stepper.step(&'a');
    stepper.step(&'a');
    let tracer = stepper.into_tracer();

    assert_eq!(tracer.lines(), ["accept @1", "exhausted @1"]);
}
